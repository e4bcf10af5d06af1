use crate::{Result, ScraperError};
use std::path::{Path, PathBuf};

#[cfg(target_os = "macos")]
const CANDIDATES: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
];

#[cfg(target_os = "linux")]
const CANDIDATES: &[&str] = &[
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/snap/bin/chromium",
];

#[cfg(target_os = "windows")]
const CANDIDATES: &[&str] = &[
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe",
];

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
const CANDIDATES: &[&str] = &[];

#[cfg(windows)]
const PATH_BINARIES: &[&str] = &["chrome.exe", "chromium.exe", "msedge.exe"];

#[cfg(not(windows))]
const PATH_BINARIES: &[&str] = &["google-chrome", "chromium", "chromium-browser", "chrome"];

pub fn find_chrome_executable() -> Result<PathBuf> {
    locate(CANDIDATES, PATH_BINARIES).ok_or_else(chrome_not_found)
}

fn locate(candidates: &[&str], binaries: &[&str]) -> Option<PathBuf> {
    candidates
        .iter()
        .map(Path::new)
        .find(|p| p.exists())
        .map(Path::to_path_buf)
        .or_else(|| binaries.iter().find_map(|b| which::which(b).ok()))
}

fn chrome_not_found() -> ScraperError {
    ScraperError::LaunchFailed(
        "Could not find Chrome/Chromium executable. Set --chrome-path or CHROME_PATH".into(),
    )
}

/// Process-wide interrupt flag, polled by the scrape loop between events so
/// the registry is still written on Ctrl-C or SIGTERM.
pub mod signal {
    use std::sync::atomic::{AtomicBool, Ordering};

    static SHUTDOWN: AtomicBool = AtomicBool::new(false);

    pub fn is_shutdown() -> bool {
        SHUTDOWN.load(Ordering::Relaxed)
    }

    pub fn set_shutdown() {
        SHUTDOWN.store(true, Ordering::Relaxed);
    }

    pub fn setup_handlers() -> crate::Result<()> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};

            let mut sigint = signal(SignalKind::interrupt())?;
            let mut sigterm = signal(SignalKind::terminate())?;

            tokio::spawn(async move {
                tokio::select! {
                    _ = sigint.recv() => {
                        tracing::warn!("Received SIGINT, finishing current event...");
                    }
                    _ = sigterm.recv() => {
                        tracing::warn!("Received SIGTERM, finishing current event...");
                    }
                }
                set_shutdown();
            });
        }

        #[cfg(not(unix))]
        {
            tokio::spawn(async {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("Received Ctrl+C, finishing current event...");
                    set_shutdown();
                }
            });
        }

        Ok(())
    }
}
