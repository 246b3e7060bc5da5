// SSH transport
//
// One `SshClient` per device poll: connect, authenticate, run a single
// command, disconnect. Host keys are not verified; access points ship with
// self-generated keys that no known_hosts file will ever contain.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use russh::client;
use russh::keys::{PrivateKey, PrivateKeyWithHashAlg, PublicKey};
use russh::{ChannelMsg, Disconnect};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, trace};

use crate::error::Error;

/// Default SSH port on UniFi access points.
pub const DEFAULT_PORT: u16 = 22;

/// Login material for one device. At least one of `password` / `key_file`
/// is expected; with both, the password is tried first.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: Option<SecretString>,
    pub key_file: Option<PathBuf>,
}

struct AcceptAnyHostKey;

impl client::Handler for AcceptAnyHostKey {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &PublicKey,
    ) -> Result<bool, Self::Error> {
        trace!("accepting unverified host key");
        Ok(true)
    }
}

/// An authenticated SSH session to one access point.
pub struct SshClient {
    session: client::Handle<AcceptAnyHostKey>,
}

impl SshClient {
    /// Connect to `host:port` and authenticate.
    ///
    /// The key file, if any, is loaded before dialing so that a broken key
    /// fails fast without touching the network.
    pub async fn connect(host: &str, port: u16, credentials: &Credentials) -> Result<Self, Error> {
        let key = match credentials.key_file {
            Some(ref path) => Some(load_key(path).await?),
            None => None,
        };

        let address = format!("{host}:{port}");
        debug!(%address, username = %credentials.username, "connecting");

        let config = Arc::new(client::Config::default());
        let session = client::connect(config, (host, port), AcceptAnyHostKey)
            .await
            .map_err(|source| Error::Connect {
                address: address.clone(),
                source,
            })?;

        let mut client = Self { session };
        match client.authenticate(credentials, key).await {
            Ok(true) => {
                debug!(%address, "SSH authentication successful");
                Ok(client)
            }
            Ok(false) => {
                client.close().await;
                Err(Error::Authentication {
                    username: credentials.username.clone(),
                })
            }
            Err(e) => {
                client.close().await;
                Err(e)
            }
        }
    }

    async fn authenticate(
        &mut self,
        credentials: &Credentials,
        key: Option<PrivateKey>,
    ) -> Result<bool, Error> {
        let username = credentials.username.as_str();

        if let Some(ref password) = credentials.password {
            let result = self
                .session
                .authenticate_password(username, password.expose_secret())
                .await?;
            if result.success() {
                return Ok(true);
            }
            debug!(username, "password rejected");
        }

        if let Some(key) = key {
            let hash_alg = self.session.best_supported_rsa_hash().await?.flatten();
            let key = PrivateKeyWithHashAlg::new(Arc::new(key), hash_alg);
            let result = self.session.authenticate_publickey(username, key).await?;
            if result.success() {
                return Ok(true);
            }
            debug!(username, "public key rejected");
        }

        Ok(false)
    }

    /// Run `command` and return everything it wrote to stdout.
    ///
    /// Blocks until the remote process has exited and the channel is closed.
    /// A non-zero exit status is an error carrying the command's stderr.
    pub async fn execute(&mut self, command: &str) -> Result<Vec<u8>, Error> {
        debug!(command, "executing remote command");

        let mut channel = self.session.channel_open_session().await?;
        channel.exec(true, command).await?;

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let mut exit_status = None;

        while let Some(msg) = channel.wait().await {
            match msg {
                ChannelMsg::Data { ref data } => stdout.extend_from_slice(data),
                ChannelMsg::ExtendedData { ref data, ext: 1 } => stderr.extend_from_slice(data),
                ChannelMsg::ExitStatus { exit_status: status } => exit_status = Some(status),
                _ => {}
            }
        }

        match exit_status {
            Some(0) => {
                debug!(bytes = stdout.len(), "remote command finished");
                Ok(stdout)
            }
            Some(status) => Err(Error::Command {
                status,
                stderr: String::from_utf8_lossy(&stderr).trim().to_owned(),
            }),
            None => Err(Error::NoExitStatus),
        }
    }

    /// Disconnect. Failures are logged and swallowed; the handle is dropped
    /// either way, which tears the TCP connection down.
    pub async fn close(self) {
        if let Err(e) = self
            .session
            .disconnect(Disconnect::ByApplication, "", "en")
            .await
        {
            trace!(error = %e, "SSH disconnect failed");
        }
    }
}

async fn load_key(path: &Path) -> Result<PrivateKey, Error> {
    let pem = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| Error::KeyRead {
            path: path.to_owned(),
            source,
        })?;
    russh::keys::decode_secret_key(&pem, None).map_err(|source| Error::KeyParse {
        path: path.to_owned(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    fn key_credentials(path: PathBuf) -> Credentials {
        Credentials {
            username: "admin".into(),
            password: None,
            key_file: Some(path),
        }
    }

    #[tokio::test]
    async fn missing_key_file_fails_before_dialing() {
        let creds = key_credentials(PathBuf::from("/nonexistent/uapx/id_ed25519"));
        // Port 9 on a TEST-NET address would hang if we dialed; the key
        // error must come first.
        let Err(err) = SshClient::connect("192.0.2.1", 9, &creds).await else {
            panic!("connect unexpectedly succeeded");
        };
        assert!(matches!(err, Error::KeyRead { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn garbage_key_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "this is not a private key").unwrap();

        let creds = key_credentials(file.path().to_owned());
        let Err(err) = SshClient::connect("192.0.2.1", 9, &creds).await else {
            panic!("connect unexpectedly succeeded");
        };
        assert!(matches!(err, Error::KeyParse { .. }), "{err:?}");
    }
}
