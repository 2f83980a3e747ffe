pub mod api;

use crate::cli::Args;
use crate::conversation::ConversationService;
use std::error::Error;
use std::sync::Arc;

pub struct Server {
    service: Arc<ConversationService>,
    args: Args,
}

impl Server {
    pub fn new(
        service: Arc<ConversationService>,
        args: Args,
    ) -> Self {
        Self {
            service,
            args,
        }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        api::start_http_server(&self.args, self.service.clone()).await
    }
}
