//! Interactive session: wires menu choices to scraping, the store, the
//! filter, and the exporter.

use std::future::Future;
use std::path::PathBuf;

use anyhow::Context;
use fake_sms::{
    available_numbers, export_messages, messages_for, Fetcher, Message, MessageFilter, Number,
    RecordStore, SmsError, SmsResult,
};

use crate::menu::{confirm, main_menu, select, MainChoice, Prompt};

/// Pattern used when the operator leaves the filter blank.
pub const MATCH_ALL: &str = ".*";

const RULE: &str = "===========================================";

/// State for one interactive run.
pub struct Session<P: Prompt> {
    fetcher: Fetcher,
    store: RecordStore,
    export_dir: PathBuf,
    prompt: P,
}

impl<P: Prompt> Session<P> {
    pub fn new(fetcher: Fetcher, store: RecordStore, export_dir: PathBuf, prompt: P) -> Self {
        Self {
            fetcher,
            store,
            export_dir,
            prompt,
        }
    }

    /// Show the main menu until the operator exits. The first error ends
    /// the session.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match main_menu(&mut self.prompt)? {
                MainChoice::Register => self.register().await?,
                MainChoice::List => self.list()?,
                MainChoice::Remove => self.remove()?,
                MainChoice::CheckMessages => self.check_messages().await?,
                MainChoice::Exit => {
                    println!("Bye!");
                    return Ok(());
                }
            }
        }
    }

    /// Pick one of the currently offered numbers and register it.
    pub async fn register(&mut self) -> anyhow::Result<()> {
        let fetcher = &self.fetcher;
        let numbers = retry_fetch(&mut self.prompt, || available_numbers(fetcher))
            .await
            .context("Failed to load available numbers")?;
        if numbers.is_empty() {
            println!("No new numbers available right now");
            return Ok(());
        }

        let Some(chosen) = self.choose_number(
            "These are the available numbers, choose any one of them",
            numbers,
        )?
        else {
            return Ok(());
        };

        println!("Selected {chosen}, saving to database");
        match self.store.append(chosen) {
            Ok(()) => Ok(()),
            Err(SmsError::DuplicateNumber(number)) => {
                println!("{number} is already registered");
                Ok(())
            }
            Err(e) => Err(e).context("Failed to save the number"),
        }
    }

    /// Print the registered numbers.
    pub fn list(&self) -> anyhow::Result<()> {
        let numbers = self
            .store
            .list()
            .context("Failed to read registered numbers")?;
        print_numbers(&numbers);
        Ok(())
    }

    /// Pick a registered number and remove it.
    pub fn remove(&mut self) -> anyhow::Result<()> {
        let numbers = self
            .store
            .list()
            .context("Failed to read registered numbers")?;
        if numbers.is_empty() {
            println!("No numbers saved to delete");
            return Ok(());
        }

        let items: Vec<String> = numbers.iter().map(ToString::to_string).collect();
        let Some(index) = select(&mut self.prompt, "Choose the number to remove", &items)?.index()
        else {
            println!("Nothing selected");
            return Ok(());
        };

        let chosen = &numbers[index].number;
        let removed = self
            .store
            .remove_number(chosen)
            .with_context(|| format!("Failed to remove {chosen}"))?;
        println!("Removed {removed}");
        Ok(())
    }

    /// Pick a registered number, fetch its messages, optionally filter
    /// them, then print and export the result.
    pub async fn check_messages(&mut self) -> anyhow::Result<()> {
        let numbers = self
            .store
            .list()
            .context("Failed to read registered numbers")?;
        if numbers.is_empty() {
            println!("No numbers registered yet, add one first");
            return Ok(());
        }

        let Some(chosen) = self.choose_number("Whose messages do you want to read?", numbers)?
        else {
            return Ok(());
        };

        println!("Selected {chosen}, fetching messages");
        let fetcher = &self.fetcher;
        let number = chosen.number.as_str();
        let messages = retry_fetch(&mut self.prompt, || messages_for(fetcher, number))
            .await
            .with_context(|| format!("Failed to fetch messages for {number}"))?;

        let messages = if confirm(&mut self.prompt, "Do you want to filter the messages?")? {
            match self.ask_filter()? {
                Some(filter) => filter.apply(&messages),
                None => messages,
            }
        } else {
            messages
        };

        print_messages(&messages);
        let path = export_messages(&self.export_dir, number, &messages)
            .context("Failed to export messages")?;
        println!("Saved {} messages to {}", messages.len(), path.display());
        Ok(())
    }

    fn choose_number(
        &mut self,
        label: &str,
        numbers: Vec<Number>,
    ) -> anyhow::Result<Option<Number>> {
        let items: Vec<String> = numbers.iter().map(ToString::to_string).collect();
        match select(&mut self.prompt, label, &items)?.index() {
            Some(index) => Ok(numbers.into_iter().nth(index)),
            None => {
                println!("Nothing selected");
                Ok(None)
            }
        }
    }

    /// Read a filter pattern, re-asking while it does not compile.
    /// A blank answer matches everything; closed input means no filter.
    fn ask_filter(&mut self) -> anyhow::Result<Option<MessageFilter>> {
        loop {
            let Some(answer) = self
                .prompt
                .read_line("Enter the filter regular expression: ")?
            else {
                return Ok(None);
            };
            let pattern = if answer.trim().is_empty() {
                MATCH_ALL
            } else {
                answer.as_str()
            };
            match MessageFilter::new(pattern) {
                Ok(filter) => return Ok(Some(filter)),
                Err(e) => println!("  {e}"),
            }
        }
    }
}

/// Run a fetch, offering to try again while it fails with a retryable error.
async fn retry_fetch<T, F, Fut>(prompt: &mut dyn Prompt, mut op: F) -> anyhow::Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = SmsResult<T>>,
{
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() => {
                tracing::debug!("Retryable fetch failure: {e}");
                println!("  {e}");
                if !confirm(prompt, "Try again?")? {
                    return Err(e.into());
                }
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Print numbers as a `Country / Number / Created At` table.
pub fn print_numbers(numbers: &[Number]) {
    if numbers.is_empty() {
        println!("No numbers registered yet");
        return;
    }
    println!("{:<20} {:<18} Created At", "Country", "Number");
    println!("{}", "=".repeat(71));
    for n in numbers {
        println!("{:<20} {:<18} {}", n.country, n.number, n.created_at);
    }
}

/// Print messages one block per SMS.
pub fn print_messages(messages: &[Message]) {
    println!("{RULE}");
    if messages.is_empty() {
        println!("No messages");
        println!("{RULE}");
        return;
    }
    for m in messages {
        println!("Sender: {}, at: {}", m.originator, m.created_at);
        println!("Body: {}", m.body);
        println!("{RULE}");
    }
}
