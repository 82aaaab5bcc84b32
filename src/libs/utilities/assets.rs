// HTTP plumbing shared by the catalog fetcher and the installer loop.
//
// All requests go through a `ureq` agent built here so that timeouts, redirects and
// the user agent are configured in one place.

use std::io::{self, Write};
use std::time::Duration;

use colored::Colorize;

use crate::libs::font_installer::{ProbeError, ReleaseSource};
use crate::schemas::fonts::FontName;
use crate::schemas::settings::InstallerSettings;
use crate::log_debug;

/// User agent sent with every request. GitHub rejects API calls without one.
pub fn user_agent() -> String {
    format!("nerdfonts-installer/{}", env!("CARGO_PKG_VERSION"))
}

/// Builds an agent for small requests (catalog, existence probes).
pub fn api_agent(settings: &InstallerSettings) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .user_agent(&user_agent())
        .timeout_connect(Duration::from_secs(settings.connect_timeout_secs))
        .timeout(Duration::from_secs(settings.request_timeout_secs))
        .redirects(5)
        .build()
}

/// Builds an agent for archive downloads, which may take minutes.
pub fn download_agent(settings: &InstallerSettings) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .user_agent(&user_agent())
        .timeout_connect(Duration::from_secs(settings.connect_timeout_secs))
        .timeout(Duration::from_secs(settings.download_timeout_secs))
        .redirects(5)
        .build()
}

/// Turns a `ureq` error into a short human-readable reason.
pub fn describe_ureq_error(err: &ureq::Error) -> String {
    match err {
        ureq::Error::Status(code, response) => {
            format!("HTTP {} {}", code, response.status_text())
        }
        ureq::Error::Transport(transport) => transport.to_string(),
    }
}

/// Release archives served from `<base>/<FontName>.zip`.
pub struct HttpReleaseSource {
    base_url: String,
    probe_agent: ureq::Agent,
    download_agent: ureq::Agent,
}

impl HttpReleaseSource {
    pub fn new(settings: &InstallerSettings) -> Self {
        HttpReleaseSource {
            base_url: settings.release_base_url.trim_end_matches('/').to_string(),
            probe_agent: api_agent(settings),
            download_agent: download_agent(settings),
        }
    }

    pub fn archive_url(&self, name: &FontName) -> String {
        format!("{}/{}", self.base_url, name.archive_file_name())
    }
}

impl ReleaseSource for HttpReleaseSource {
    fn probe(&self, name: &FontName) -> Result<(), ProbeError> {
        let url = self.archive_url(name);
        log_debug!("[Assets] HEAD {}", url.blue());

        match self.probe_agent.head(&url).call() {
            Ok(response) if response.status() == 200 => Ok(()),
            Ok(response) => Err(ProbeError(format!("HTTP {}", response.status()))),
            Err(e) => Err(ProbeError(describe_ureq_error(&e))),
        }
    }

    fn download(&self, name: &FontName, out: &mut dyn Write) -> io::Result<u64> {
        let url = self.archive_url(name);
        log_debug!("[Assets] GET {}", url.blue());

        let response = self
            .download_agent
            .get(&url)
            .call()
            .map_err(|e| io::Error::other(describe_ureq_error(&e)))?;

        let mut reader = response.into_reader();
        let bytes = io::copy(&mut reader, out)?;
        out.flush()?;
        log_debug!("[Assets] Downloaded {} bytes for {}", bytes, name);
        Ok(bytes)
    }
}
