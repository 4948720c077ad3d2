//! Fetch-then-extract pipelines for the two remote pages.

use crate::extract::{extract_messages, extract_numbers};
use crate::fetch::Fetcher;
use crate::types::{Message, Number, SmsResult};

/// Numbers currently offered on the listing page.
pub async fn available_numbers(fetcher: &Fetcher) -> SmsResult<Vec<Number>> {
    let html = fetcher.fetch_number_listing().await?;
    let numbers = extract_numbers(&html)?;
    tracing::info!("Found {} available numbers", numbers.len());
    Ok(numbers)
}

/// Messages received on `number`, in page order.
pub async fn messages_for(fetcher: &Fetcher, number: &str) -> SmsResult<Vec<Message>> {
    let html = fetcher.fetch_messages_for(number).await?;
    let messages = extract_messages(&html)?;
    tracing::info!("Fetched {} messages for {number}", messages.len());
    Ok(messages)
}
