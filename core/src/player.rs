use std::process::{Child, Command};

use tracing::{info, warn};

use crate::error::{GalleryError, Result};
use crate::models::VideoEntry;

pub const DEFAULT_PLAYER_COMMAND: &str = "vlc --no-video-title-show {URL}";

/// Something that can play one source at a time.
pub trait PlaybackBackend: Send {
    fn load(&mut self, url: &str) -> Result<()>;
    fn play(&mut self) -> Result<()>;
    fn stop(&mut self);
}

/// Splits a player command template into program and arguments, substituting the
/// `{URL}` placeholder (also `URL` / `{url}`) or appending the URL when absent.
pub fn build_command(template: &str, url: &str) -> Option<(String, Vec<String>)> {
    let cmd = if template.trim().is_empty() { DEFAULT_PLAYER_COMMAND } else { template };
    let mut parts: Vec<String> = cmd.split_whitespace().map(|s| s.to_string()).collect();
    let mut replaced = false;
    for p in &mut parts {
        if p == "URL" || p == "{URL}" || p == "{url}" {
            *p = url.to_string();
            replaced = true;
        }
    }
    if !replaced {
        parts.push(url.to_string());
    }
    if parts.is_empty() {
        return None;
    }
    let program = parts.remove(0);
    Some((program, parts))
}

/// Plays through an external player process; a new selection kills the previous one.
pub struct ExternalPlayer {
    command: String,
    source: Option<String>,
    child: Option<Child>,
}

impl ExternalPlayer {
    pub fn new(command: impl Into<String>) -> Self {
        Self { command: command.into(), source: None, child: None }
    }
}

impl PlaybackBackend for ExternalPlayer {
    fn load(&mut self, url: &str) -> Result<()> {
        self.source = Some(url.to_string());
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        let url = self.source.clone().ok_or_else(|| GalleryError::Player("no source loaded".into()))?;
        let (program, args) =
            build_command(&self.command, &url).ok_or_else(|| GalleryError::Player("empty player command".into()))?;
        match Command::new(&program).args(&args).spawn() {
            Ok(child) => {
                info!(pid = child.id(), program = %program, "Spawned player");
                self.child = Some(child);
                Ok(())
            }
            Err(e) => {
                warn!(program = %program, error = %e, "Failed to spawn player");
                Err(GalleryError::Player(format!("{program}: {e}")))
            }
        }
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Drop for ExternalPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Selected video plus the title/date readout.
pub struct PlayerPanel<B: PlaybackBackend> {
    backend: B,
    current: Option<VideoEntry>,
}

impl<B: PlaybackBackend> PlayerPanel<B> {
    pub fn new(backend: B) -> Self {
        Self { backend, current: None }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn current(&self) -> Option<&VideoEntry> {
        self.current.as_ref()
    }

    pub fn title(&self) -> Option<&str> {
        self.current.as_ref().map(|e| e.display_name.as_str())
    }

    pub fn date_label(&self) -> Option<String> {
        self.current.as_ref().map(|e| e.date_label())
    }

    /// Preempts whatever is playing, loads `entry` and starts it right away.
    /// The readout switches to `entry` even if the player fails to start.
    pub fn select(&mut self, entry: VideoEntry) -> Result<()> {
        self.backend.stop();
        let url = entry.url.clone();
        self.current = Some(entry);
        self.backend.load(&url)?;
        self.backend.play()
    }

    /// Swaps in the renamed entry when the panel still shows the video that
    /// lived at `previous_url`. Playback is left alone.
    pub fn replace_current(&mut self, previous_url: &str, entry: VideoEntry) -> bool {
        match self.current.as_mut() {
            Some(current) if current.url == previous_url => {
                *current = entry;
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.backend.stop();
        self.current = None;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Records backend calls in order.
    #[derive(Default)]
    pub(crate) struct ScriptedBackend {
        pub calls: Vec<String>,
    }

    impl PlaybackBackend for ScriptedBackend {
        fn load(&mut self, url: &str) -> Result<()> {
            self.calls.push(format!("load {url}"));
            Ok(())
        }
        fn play(&mut self) -> Result<()> {
            self.calls.push("play".into());
            Ok(())
        }
        fn stop(&mut self) {
            self.calls.push("stop".into());
        }
    }

    #[test]
    fn test_build_command_placeholder() {
        let (p, a) = build_command("mpv --fs {URL} --loop", "http://h/a.mp4").unwrap();
        assert_eq!(p, "mpv");
        assert_eq!(a, vec!["--fs", "http://h/a.mp4", "--loop"]);
    }

    #[test]
    fn test_build_command_appends_url() {
        let (p, a) = build_command("mpv --fs", "u").unwrap();
        assert_eq!(p, "mpv");
        assert_eq!(a, vec!["--fs", "u"]);
        let (p, _) = build_command("  ", "u").unwrap();
        assert_eq!(p, "vlc");
    }

    #[test]
    fn test_select_preempts_and_autoplays() {
        let mut panel = PlayerPanel::new(ScriptedBackend::default());
        panel.select(VideoEntry::new("u1", "first", 0)).unwrap();
        panel.select(VideoEntry::new("u2", "second", 86_400_000)).unwrap();
        assert_eq!(panel.backend().calls, vec!["stop", "load u1", "play", "stop", "load u2", "play"]);
        assert_eq!(panel.title(), Some("second"));
    }

    #[test]
    fn test_replace_current_only_for_same_video() {
        let mut panel = PlayerPanel::new(ScriptedBackend::default());
        let renamed = VideoEntry::new("http://h/vacation.mp4", "vacation", 0);
        assert!(!panel.replace_current("http://h/clip1.mp4", renamed.clone()));
        assert_eq!(panel.title(), None);

        panel.select(VideoEntry::new("http://h/other.mp4", "other", 0)).unwrap();
        assert!(!panel.replace_current("http://h/clip1.mp4", renamed.clone()));
        assert_eq!(panel.title(), Some("other"));

        panel.select(VideoEntry::new("http://h/clip1.mp4", "clip1", 0)).unwrap();
        assert!(panel.replace_current("http://h/clip1.mp4", renamed));
        assert_eq!(panel.current().map(|e| e.url.as_str()), Some("http://h/vacation.mp4"));
        assert_eq!(panel.backend().calls.len(), 6);
    }
}
