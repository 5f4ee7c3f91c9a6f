//! Article retrieval commands: STAT, HEAD, BODY, ARTICLE
//!
//! Each verb accepts either a bracketed message-id or a bare article number
//! in the current group, and the accepted error codes differ between the
//! two forms: a message-id miss is 430, a number miss is 423 (or 412 when
//! no group is selected). The envelopes are returned so callers can treat
//! those misses as data rather than failures.

use super::NntpClient;
use crate::commands;
use crate::error::Result;
use crate::response::{ResponseEnvelope, codes};

fn accept_set(id: &str, success: u16) -> Vec<u16> {
    if commands::is_message_id(id) {
        vec![success, codes::NO_SUCH_ARTICLE_ID]
    } else {
        vec![
            success,
            codes::NO_GROUP_SELECTED,
            codes::NO_SUCH_ARTICLE_NUMBER,
        ]
    }
}

impl NntpClient {
    /// STAT an article: existence check without any transfer
    pub async fn stat(&mut self, id: &str) -> Result<ResponseEnvelope> {
        self.send_command(&commands::stat(id)).await?;
        self.read_reply(false)
            .await?
            .expect(&accept_set(id, codes::ARTICLE_STAT))
    }

    /// Fetch an article's headers
    pub async fn head(&mut self, id: &str) -> Result<ResponseEnvelope> {
        self.send_command(&commands::head(id)).await?;
        self.read_reply(true)
            .await?
            .expect(&accept_set(id, codes::HEAD_FOLLOWS))
    }

    /// Fetch an article's body
    pub async fn body(&mut self, id: &str) -> Result<ResponseEnvelope> {
        self.send_command(&commands::body(id)).await?;
        self.read_reply(true)
            .await?
            .expect(&accept_set(id, codes::BODY_FOLLOWS))
    }

    /// Fetch a complete article, headers and body
    pub async fn article(&mut self, id: &str) -> Result<ResponseEnvelope> {
        self.send_command(&commands::article(id)).await?;
        self.read_reply(true)
            .await?
            .expect(&accept_set(id, codes::ARTICLE_FOLLOWS))
    }
}
