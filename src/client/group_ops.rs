//! Newsgroup selection

use super::NntpClient;
use crate::commands::{self, GroupInfo};
use crate::error::{NntpError, Result};
use crate::response::codes;
use tracing::debug;

impl NntpClient {
    /// Select a newsgroup with GROUP
    ///
    /// The group is recorded as current before the response is validated,
    /// so later spool paths refer to the requested group even when the
    /// selection fails.
    pub async fn select_group(&mut self, name: &str) -> Result<GroupInfo> {
        self.send_command(&commands::group(name)).await?;
        self.current_group = Some(name.to_string());

        let resp = self
            .read_reply(false)
            .await?
            .expect(&[codes::GROUP_SELECTED, codes::NO_SUCH_GROUP])?;
        if resp.code == codes::NO_SUCH_GROUP {
            return Err(NntpError::NoSuchGroup(name.to_string()));
        }

        let info = commands::parse_group_info(&resp.message)?;
        debug!(
            group = info.name,
            count = info.count,
            low = info.low,
            high = info.high,
            "group selected"
        );
        Ok(info)
    }
}
