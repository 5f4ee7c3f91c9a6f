//! AUTHINFO USER/PASS authentication

use super::NntpClient;
use crate::commands;
use crate::error::{NntpError, Result};
use crate::response::codes;
use tracing::debug;

impl NntpClient {
    /// Authenticate with AUTHINFO USER/PASS
    ///
    /// Credentials are only ever sent over TLS; on a plain connection, or
    /// when the server entry carries no username, this is a no-op. A 381
    /// continuation triggers the PASS step; any final code other than 281
    /// is an authentication failure.
    pub async fn authenticate(&mut self) -> Result<()> {
        if !self.secure {
            debug!("skipping authentication on insecure connection");
            return Ok(());
        }
        let Some(user) = self.entry.user.clone() else {
            debug!("no credentials configured, skipping authentication");
            return Ok(());
        };

        self.send_command(&commands::authinfo_user(&user)).await?;
        let resp = self.read_reply(false).await?.expect(&[
            codes::AUTH_ACCEPTED,
            codes::AUTH_CONTINUE,
            codes::AUTH_REJECTED,
            codes::AUTH_OUT_OF_SEQUENCE,
            codes::ACCESS_DENIED,
        ])?;

        let resp = if resp.code == codes::AUTH_CONTINUE {
            let pass = self.entry.pass.clone().unwrap_or_default();
            self.send_command(&commands::authinfo_pass(&pass)).await?;
            self.read_reply(false).await?.expect(&[
                codes::AUTH_ACCEPTED,
                codes::AUTH_REJECTED,
                codes::AUTH_OUT_OF_SEQUENCE,
                codes::ACCESS_DENIED,
            ])?
        } else {
            resp
        };

        if resp.code != codes::AUTH_ACCEPTED {
            return Err(NntpError::AuthFailed(format!(
                "{} {}",
                resp.code, resp.message
            )));
        }
        debug!(user, "authenticated");
        Ok(())
    }
}
