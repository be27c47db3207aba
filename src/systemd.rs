// src/systemd.rs

//! systemd service and timer units for running the notifier unattended.
//!
//! The timer drives repetition, so the service runs a single cycle.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::Mode;
use crate::storage::write_atomic;

/// Everything needed to render a service/timer pair.
#[derive(Debug, Clone)]
pub struct UnitSpec {
    pub mode: Mode,
    pub domain: String,
    pub api_key: String,
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
    pub thread_id: Option<String>,
    pub hide_adult: bool,
    pub interval_secs: u64,
    pub service_name: String,
    pub description: String,
    pub executable: PathBuf,
    pub working_dir: PathBuf,
}

impl UnitSpec {
    /// Spec with the conventional name, description and interval for `mode`.
    pub fn new(
        mode: Mode,
        domain: impl Into<String>,
        api_key: impl Into<String>,
        executable: impl Into<PathBuf>,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        let domain = domain.into();
        let purpose = match mode {
            Mode::Additions => "for new mods",
            Mode::Updates => "for updated mods",
        };

        Self {
            service_name: format!("nexusmods-notifier-{domain}-{mode}"),
            description: format!("NexusMods Notifier service for {domain} {purpose}"),
            interval_secs: match mode {
                Mode::Additions => 300,
                Mode::Updates => 3600,
            },
            mode,
            domain,
            api_key: api_key.into(),
            bot_token: None,
            chat_id: None,
            thread_id: None,
            hide_adult: false,
            executable: executable.into(),
            working_dir: working_dir.into(),
        }
    }

    /// Command line passed to the notifier binary.
    pub fn arguments(&self) -> String {
        let mut args = vec![
            "--once".to_string(),
            format!("-k {}", quote(&self.api_key)),
            format!("-g {}", quote(&self.domain)),
        ];
        if let (Some(token), Some(chat_id)) = (&self.bot_token, &self.chat_id) {
            args.push(format!("-t {}", quote(token)));
            args.push(format!("-c {}", quote(chat_id)));
        }
        if let Some(thread_id) = self.thread_id.as_deref().filter(|t| !t.is_empty()) {
            args.push(format!("-o {}", quote(thread_id)));
        }
        if self.hide_adult {
            args.push("-a".to_string());
        }
        args.push(self.mode.to_string());
        args.join(" ")
    }

    pub fn render_service(&self) -> String {
        format!(
            "[Unit]
Description={description}
After=network-online.target
Wants=network-online.target

[Service]
Type=oneshot
WorkingDirectory={working_dir}
ExecStart={exe} {args}
Environment=RUST_LOG=info

[Install]
WantedBy=multi-user.target
",
            description = self.description,
            working_dir = self.working_dir.display(),
            exe = quote(&self.executable.display().to_string()),
            args = self.arguments(),
        )
    }

    pub fn render_timer(&self) -> String {
        format!(
            "[Unit]
Description=Timer for {description}

[Timer]
OnBootSec=1min
OnUnitActiveSec={interval}s
Unit={name}.service

[Install]
WantedBy=timers.target
",
            description = self.description,
            interval = self.interval_secs,
            name = self.service_name,
        )
    }

    pub fn service_file_name(&self) -> String {
        format!("{}.service", self.service_name)
    }

    pub fn timer_file_name(&self) -> String {
        format!("{}.timer", self.service_name)
    }

    /// Write both units into `dir`, returning their paths.
    pub async fn write_to(&self, dir: &Path) -> Result<(PathBuf, PathBuf)> {
        let service = dir.join(self.service_file_name());
        let timer = dir.join(self.timer_file_name());

        write_atomic(&service, self.render_service().as_bytes()).await?;
        write_atomic(&timer, self.render_timer().as_bytes()).await?;

        log::info!("Saved {} and {}", service.display(), timer.display());
        Ok((service, timer))
    }
}

/// `~/.config/systemd/user`, if the user's config directory is known.
pub fn user_unit_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("systemd/user"))
}

/// Double-quote a value for `ExecStart=`, escaping what systemd would expand.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '%' => out.push_str("%%"),
            '$' => out.push_str("$$"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn spec(mode: Mode) -> UnitSpec {
        UnitSpec::new(
            mode,
            "starfield",
            "KEY",
            "/usr/local/bin/notifier",
            "/srv/notifier",
        )
    }

    #[test]
    fn test_defaults_follow_mode() {
        let additions = spec(Mode::Additions);
        assert_eq!(additions.service_name, "nexusmods-notifier-starfield-additions");
        assert_eq!(
            additions.description,
            "NexusMods Notifier service for starfield for new mods"
        );
        assert_eq!(additions.interval_secs, 300);

        let updates = spec(Mode::Updates);
        assert_eq!(updates.interval_secs, 3600);
        assert!(updates.description.ends_with("for updated mods"));
    }

    #[test]
    fn test_arguments() {
        let mut unit = spec(Mode::Updates);
        unit.bot_token = Some("123:abc".into());
        unit.chat_id = Some("-100".into());
        unit.thread_id = Some("7".into());
        unit.hide_adult = true;

        assert_eq!(
            unit.arguments(),
            r#"--once -k "KEY" -g "starfield" -t "123:abc" -c "-100" -o "7" -a updates"#
        );
    }

    #[test]
    fn test_arguments_without_telegram() {
        let unit = spec(Mode::Additions);
        assert_eq!(unit.arguments(), r#"--once -k "KEY" -g "starfield" additions"#);
    }

    #[test]
    fn test_render_units() {
        let unit = spec(Mode::Additions);

        let service = unit.render_service();
        assert!(service.contains("WorkingDirectory=/srv/notifier\n"));
        assert!(service.contains("ExecStart=\"/usr/local/bin/notifier\" --once"));

        let timer = unit.render_timer();
        assert!(timer.contains("OnUnitActiveSec=300s\n"));
        assert!(timer.contains("Unit=nexusmods-notifier-starfield-additions.service\n"));
    }

    #[test]
    fn test_quote_escapes_specifiers() {
        assert_eq!(quote(r#"a"b\c%d$e"#), r#""a\"b\\c%%d$$e""#);
    }

    #[test]
    fn test_user_unit_dir_under_config_dir() {
        assert_eq!(
            user_unit_dir(),
            dirs::config_dir().map(|dir| dir.join("systemd").join("user"))
        );
    }

    #[tokio::test]
    async fn test_write_to() {
        let tmp = TempDir::new().unwrap();
        let unit = spec(Mode::Updates);

        let (service, timer) = unit.write_to(tmp.path()).await.unwrap();
        assert!(service.ends_with("nexusmods-notifier-starfield-updates.service"));
        assert_eq!(std::fs::read_to_string(&timer).unwrap(), unit.render_timer());
    }
}
