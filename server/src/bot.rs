use app::{
    command::Command,
    config::{BotConfig, Config},
    dispatcher::{Dispatcher, Reply},
    error,
    geocoder::Geocoder,
    map::MapRenderer,
    store::RecordStore,
    telegram::{TelegramClient, Update},
};
use std::time::Duration;
use tracing::{error, info, warn};

const POLL_ERROR_DELAY: Duration = Duration::from_secs(5);

pub const ABORTED_REPLY: &str =
    "Sorry, that command could not be completed. Nothing was changed.";

/// Build the dispatcher from configuration and poll forever.
pub async fn run_bot(config: Config, bot_config: BotConfig) -> anyhow::Result<()> {
    let store = RecordStore::load(&config.data_file);
    info!(
        "Loaded {} region(s) from {}",
        store.len(),
        config.data_file.display()
    );

    let geocoder = Geocoder::new(
        config.geocoder_url.clone(),
        &config.geocoder_user_agent,
        config.geocoder_timeout,
    )?;
    let renderer = MapRenderer::new(&config.map_file);
    let dispatcher = Dispatcher::new(store, geocoder, renderer);

    let telegram = TelegramClient::new(
        bot_config.api_url.clone(),
        bot_config.token.clone(),
        bot_config.poll_timeout_secs,
    )?;

    let mut bot = Bot::new(telegram, dispatcher, bot_config.poll_timeout_secs);
    info!("Bot polling for updates");
    bot.run().await;
    Ok(())
}

/// Long-polling loop. Updates are handled strictly one at a time, so store
/// mutation, persistence and map rendering never interleave across commands.
pub struct Bot {
    telegram: TelegramClient,
    dispatcher: Dispatcher,
    poll_timeout_secs: u64,
    offset: Option<i64>,
}

impl Bot {
    pub fn new(telegram: TelegramClient, dispatcher: Dispatcher, poll_timeout_secs: u64) -> Self {
        Self {
            telegram,
            dispatcher,
            poll_timeout_secs,
            offset: None,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub async fn run(&mut self) {
        loop {
            if let Err(e) = self.poll_once().await {
                warn!(
                    "Polling failed: {}, retrying in {}s",
                    e,
                    POLL_ERROR_DELAY.as_secs()
                );
                tokio::time::sleep(POLL_ERROR_DELAY).await;
            }
        }
    }

    /// Fetch one batch of updates and process it. Returns the batch size.
    pub async fn poll_once(&mut self) -> error::Result<usize> {
        let updates = self
            .telegram
            .get_updates(self.offset, self.poll_timeout_secs)
            .await?;
        let count = updates.len();

        for update in updates {
            if let Err(e) = self.process_update(update).await {
                error!("Failed to deliver reply: {}", e);
            }
        }

        Ok(count)
    }

    /// Handle one update. The offset advances first so a failing update is
    /// never fetched again.
    pub async fn process_update(&mut self, update: Update) -> error::Result<()> {
        self.offset = Some(update.update_id + 1);

        let Some(message) = update.message else {
            return Ok(());
        };
        let Some(text) = message.text else {
            return Ok(());
        };

        let command = Command::parse(&text);
        info!("Chat {}: {:?}", message.chat.id, command);

        let reply = match self.dispatcher.handle(command).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("Command aborted for chat {}: {}", message.chat.id, e);
                Reply::text(ABORTED_REPLY)
            }
        };

        match reply {
            Reply::Text(text) => self.telegram.send_message(message.chat.id, &text).await,
            Reply::Document(path) => self.telegram.send_document(message.chat.id, &path).await,
        }
    }
}
