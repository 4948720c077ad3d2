//! Turn scraped HTML into typed records.
//!
//! Two page shapes are understood:
//!
//! - the listing page: a `div.number-boxes` container holding
//!   `div.number-boxes-item` entries, each with a `div[class="row"]` that
//!   carries the number in an `h4` and the country in an `h5`;
//! - the messages page: the first `table`, its `tbody`, and one `tr` per SMS
//!   with originator, body and timestamp cells.
//!
//! A missing top-level section is a structural error. A single item that does
//! not have the full shape is skipped, since the listing also carries ads and
//! decorative boxes.

use chrono::{Local, NaiveDateTime};
use scraper::{ElementRef, Html, Selector};

use crate::types::{Message, Number, SmsError, SmsResult};

/// `created_at` format for scraped numbers, e.g. `2026-10-19 14:03:07 Monday`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %A";

const NUMBERS_CONTAINER: &str = "div.number-boxes";
const NUMBER_ITEM: &str = "div.number-boxes-item";
const NUMBER_ROW: &str = r#"div[class="row"]"#;
const NUMBER_PRIMARY: &str = "h4";
const NUMBER_SECONDARY: &str = "h5";

/// Minimum cells a message row needs: originator, body, timestamp.
const MESSAGE_CELLS: usize = 3;

/// Format a timestamp the way scraped numbers are stamped.
pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Extract the available numbers from the listing page, stamped with the
/// current local time.
pub fn extract_numbers(html: &str) -> SmsResult<Vec<Number>> {
    extract_numbers_at(html, Local::now().naive_local())
}

/// Extract the available numbers from the listing page, stamped with `now`.
pub fn extract_numbers_at(html: &str, now: NaiveDateTime) -> SmsResult<Vec<Number>> {
    let document = Html::parse_document(html);
    let container_sel = selector(NUMBERS_CONTAINER)?;
    let item_sel = selector(NUMBER_ITEM)?;
    let row_sel = selector(NUMBER_ROW)?;
    let primary_sel = selector(NUMBER_PRIMARY)?;
    let secondary_sel = selector(NUMBER_SECONDARY)?;

    let container = document
        .select(&container_sel)
        .next()
        .ok_or_else(|| SmsError::ParsePage(format!("no '{NUMBERS_CONTAINER}' container")))?;

    let created_at = format_timestamp(now);
    let mut numbers = Vec::new();
    let mut skipped = 0usize;

    for item in container.select(&item_sel) {
        let Some(row) = item.select(&row_sel).next() else {
            skipped += 1;
            continue;
        };
        let number = row.select(&primary_sel).next().map(own_text);
        let country = row.select(&secondary_sel).next().map(own_text);

        match (number, country) {
            (Some(number), Some(country)) if !number.is_empty() && !country.is_empty() => {
                numbers.push(Number {
                    country,
                    number,
                    created_at: created_at.clone(),
                });
            }
            _ => skipped += 1,
        }
    }

    tracing::debug!(
        "Extracted {} numbers ({} items skipped)",
        numbers.len(),
        skipped
    );
    Ok(numbers)
}

/// Extract the SMS table from a number's messages page.
///
/// A missing `table` or `tbody` means the page did not load as expected and
/// is an error. A `tbody` without usable rows is an empty inbox.
pub fn extract_messages(html: &str) -> SmsResult<Vec<Message>> {
    let document = Html::parse_document(html);
    let table_sel = selector("table")?;
    let body_sel = selector("tbody")?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("td")?;

    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| SmsError::ParsePage("no messages table".to_string()))?;
    let body = table
        .select(&body_sel)
        .next()
        .ok_or_else(|| SmsError::ParsePage("messages table has no body".to_string()))?;

    let mut messages = Vec::new();
    for row in body.select(&row_sel) {
        let cells: Vec<ElementRef<'_>> = row.select(&cell_sel).collect();
        if cells.len() < MESSAGE_CELLS {
            tracing::debug!("Skipping message row with {} cells", cells.len());
            continue;
        }
        messages.push(Message {
            originator: full_text(cells[0]),
            body: full_text(cells[1]),
            created_at: full_text(cells[2]),
        });
    }

    Ok(messages)
}

fn selector(css: &str) -> SmsResult<Selector> {
    Selector::parse(css).map_err(|e| SmsError::ParsePage(format!("bad selector '{css}': {e}")))
}

/// Text of the element's own text nodes, ignoring nested elements.
fn own_text(el: ElementRef<'_>) -> String {
    let text: String = el
        .children()
        .filter_map(|child| child.value().as_text())
        .map(|t| &**t)
        .collect();
    text.trim().to_string()
}

/// All descendant text, including inline-formatted children.
fn full_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fixed_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(14, 3, 7)
            .unwrap()
    }

    fn number_item(number: &str, country: &str) -> String {
        format!(
            r#"<div class="number-boxes-item">
                 <div class="row">
                   <div class="col"><h4>{number}</h4><h5>{country}</h5></div>
                 </div>
               </div>"#
        )
    }

    fn listing(items: &str) -> String {
        format!(
            r#"<html><body><div class="container"><div class="number-boxes">{items}</div></div></body></html>"#
        )
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(fixed_now()), "2026-10-19 14:03:07 Monday");
    }

    #[test]
    fn test_two_numbers_and_a_decorative_item() {
        let decorative = r#"<div class="number-boxes-item"><div class="row"><h4>Advertise here</h4></div></div>"#;
        let html = listing(&format!(
            "{}{}{}",
            number_item("+15551234567", "USA"),
            decorative,
            number_item("+442012345678", "UK"),
        ));

        let numbers = extract_numbers_at(&html, fixed_now()).unwrap();
        assert_eq!(numbers.len(), 2);
        assert_eq!(
            numbers[0],
            Number::new("USA", "+15551234567", "2026-10-19 14:03:07 Monday")
        );
        assert_eq!(numbers[1].number, "+442012345678");
        assert_eq!(numbers[1].country, "UK");
        assert_eq!(numbers[1].created_at, "2026-10-19 14:03:07 Monday");
    }

    #[test]
    fn test_empty_container_is_not_an_error() {
        let html = listing(r#"<div class="number-boxes-item"><p>ad</p></div>"#);
        let numbers = extract_numbers_at(&html, fixed_now()).unwrap();
        assert!(numbers.is_empty());
    }

    #[test]
    fn test_missing_container_is_parse_error() {
        let html = "<html><body><h1>502 Bad Gateway</h1></body></html>";
        let err = extract_numbers(html).unwrap_err();
        assert!(matches!(err, SmsError::ParsePage(_)));
    }

    #[test]
    fn test_row_class_must_match_exactly() {
        let html = listing(
            r#"<div class="number-boxes-item"><div class="row ad"><h4>+1000</h4><h5>Nowhere</h5></div></div>"#,
        );
        assert!(extract_numbers_at(&html, fixed_now()).unwrap().is_empty());
    }

    #[test]
    fn test_number_text_is_trimmed_own_text() {
        let html = listing(
            r#"<div class="number-boxes-item"><div class="row">
                 <h4>
                   +33612345678 <small>new</small>
                 </h4>
                 <h5> France </h5>
               </div></div>"#,
        );
        let numbers = extract_numbers_at(&html, fixed_now()).unwrap();
        assert_eq!(numbers.len(), 1);
        assert_eq!(numbers[0].number, "+33612345678");
        assert_eq!(numbers[0].country, "France");
    }

    fn messages_page(rows: &str) -> String {
        format!(
            r#"<html><body><table class="table">
                 <thead><tr><th>Message From</th><th>Message</th><th>Time</th></tr></thead>
                 <tbody>{rows}</tbody>
               </table></body></html>"#
        )
    }

    #[test]
    fn test_messages_skip_short_rows_and_keep_order() {
        let html = messages_page(
            r#"<tr><td>Acme</td><td>Code 111</td><td>1 minute ago</td></tr>
               <tr><td colspan="3">Advertisement</td></tr>
               <tr><td>Bank</td><td>Code 222</td><td>3 minutes ago</td></tr>
               <tr><td>only</td><td>two</td></tr>
               <tr><td>Shop</td><td>Code 333</td><td>1 hour ago</td></tr>"#,
        );

        let messages = extract_messages(&html).unwrap();
        let originators: Vec<&str> = messages.iter().map(|m| m.originator.as_str()).collect();
        assert_eq!(originators, vec!["Acme", "Bank", "Shop"]);
        assert_eq!(messages[1], Message::new("Bank", "Code 222", "3 minutes ago"));
    }

    #[test]
    fn test_message_cells_use_full_nested_text() {
        let html = messages_page(
            r#"<tr><td><a href="/x">Acme</a></td><td>Your code is <b>4242</b></td><td><span>now</span></td></tr>"#,
        );
        let messages = extract_messages(&html).unwrap();
        assert_eq!(messages, vec![Message::new("Acme", "Your code is 4242", "now")]);
    }

    #[test]
    fn test_empty_tbody_is_empty_inbox() {
        let messages = extract_messages(&messages_page("")).unwrap();
        assert!(messages.is_empty());
    }

    #[test]
    fn test_missing_table_is_parse_error() {
        let err = extract_messages("<html><body><p>Number not found</p></body></html>").unwrap_err();
        assert!(matches!(err, SmsError::ParsePage(_)));
    }

    #[test]
    fn test_table_without_body_is_parse_error() {
        let err = extract_messages("<html><body><table></table></body></html>").unwrap_err();
        assert!(matches!(err, SmsError::ParsePage(_)));
    }
}
