//! Notification backends for different platforms

use anyhow::{bail, Result};
use std::process::Command;

/// A notification to display
#[derive(Debug, Clone)]
pub struct Notification {
    /// Notification title
    pub title: String,
    /// Notification message/body
    pub message: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Available notification backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// macOS terminal-notifier
    TerminalNotifier,
    /// macOS osascript
    Osascript,
    /// Linux notify-send
    NotifySend,
    /// KDE kdialog
    Kdialog,
    /// WSL PowerShell
    Wsl,
    /// Fallback echo
    Echo,
}

impl Backend {
    /// Detect the best available backend for the current platform
    pub fn detect() -> Self {
        #[cfg(target_os = "macos")]
        {
            if Self::command_exists("terminal-notifier") {
                return Self::TerminalNotifier;
            }
            return Self::Osascript;
        }

        #[cfg(target_os = "linux")]
        {
            if std::env::var("WSL_DISTRO_NAME").is_ok() {
                return Self::Wsl;
            }
            if Self::command_exists("notify-send") {
                return Self::NotifySend;
            }
            if Self::command_exists("kdialog") {
                return Self::Kdialog;
            }
            return Self::Echo;
        }

        #[cfg(not(any(target_os = "macos", target_os = "linux")))]
        {
            Self::Echo
        }
    }

    /// Check if a command exists
    fn command_exists(cmd: &str) -> bool {
        Command::new("which")
            .arg(cmd)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Get the name of this backend
    pub fn name(&self) -> &'static str {
        match self {
            Self::TerminalNotifier => "terminal-notifier",
            Self::Osascript => "osascript",
            Self::NotifySend => "notify-send",
            Self::Kdialog => "kdialog",
            Self::Wsl => "wsl",
            Self::Echo => "echo",
        }
    }

    /// Send a notification using this backend
    pub fn send(&self, notification: &Notification) -> Result<()> {
        match self {
            Self::TerminalNotifier => self.send_terminal_notifier(notification),
            Self::Osascript => self.send_osascript(notification),
            Self::NotifySend => self.send_notify_send(notification),
            Self::Kdialog => self.send_kdialog(notification),
            Self::Wsl => self.send_wsl(notification),
            Self::Echo => self.send_echo(notification),
        }
    }

    fn send_terminal_notifier(&self, notification: &Notification) -> Result<()> {
        let status = Command::new("terminal-notifier")
            .args([
                "-title",
                &notification.title,
                "-message",
                &notification.message,
                "-group",
                "pomo",
                "-sound",
                "default",
            ])
            .status()?;

        if !status.success() {
            bail!("terminal-notifier failed with status: {}", status);
        }
        Ok(())
    }

    fn send_osascript(&self, notification: &Notification) -> Result<()> {
        // Escape quotes in the message and title
        let title = notification.title.replace('"', r#"\""#);
        let message = notification.message.replace('"', r#"\""#);

        let script = format!(
            r#"display notification "{}" with title "{}" sound name "default""#,
            message, title
        );

        let status = Command::new("osascript").args(["-e", &script]).status()?;

        if !status.success() {
            bail!("osascript failed with status: {}", status);
        }
        Ok(())
    }

    fn send_notify_send(&self, notification: &Notification) -> Result<()> {
        let status = Command::new("notify-send")
            .args([&notification.title, &notification.message])
            .status()?;

        if !status.success() {
            bail!("notify-send failed with status: {}", status);
        }
        Ok(())
    }

    fn send_kdialog(&self, notification: &Notification) -> Result<()> {
        let status = Command::new("kdialog")
            .args([
                "--passivepopup",
                &notification.message,
                "5",
                "--title",
                &notification.title,
            ])
            .status()?;

        if !status.success() {
            bail!("kdialog failed with status: {}", status);
        }
        Ok(())
    }

    fn send_wsl(&self, notification: &Notification) -> Result<()> {
        // Escape single quotes for PowerShell
        let title = notification.title.replace('\'', "''");
        let message = notification.message.replace('\'', "''");

        let ps_script = format!(
            r#"[Windows.UI.Notifications.ToastNotificationManager, Windows.UI.Notifications, ContentType = WindowsRuntime] | Out-Null; $template = [Windows.UI.Notifications.ToastNotificationManager]::GetTemplateContent([Windows.UI.Notifications.ToastTemplateType]::ToastText02); $template.GetElementsByTagName('text')[0].AppendChild($template.CreateTextNode('{}')) | Out-Null; $template.GetElementsByTagName('text')[1].AppendChild($template.CreateTextNode('{}')) | Out-Null; [Windows.UI.Notifications.ToastNotificationManager]::CreateToastNotifier('pomo').Show([Windows.UI.Notifications.ToastNotification]::new($template))"#,
            title, message
        );

        let status = Command::new("powershell.exe")
            .args(["-Command", &ps_script])
            .status()?;

        // WSL PowerShell can fail for various reasons, fall back to echo
        if !status.success() {
            println!("[{}] {}", notification.title, notification.message);
        }
        Ok(())
    }

    fn send_echo(&self, notification: &Notification) -> Result<()> {
        println!("[{}] {}", notification.title, notification.message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_new() {
        let n = Notification::new("Pomodoro", "Break is over");
        assert_eq!(n.title, "Pomodoro");
        assert_eq!(n.message, "Break is over");
    }

    #[test]
    fn test_backend_names() {
        assert_eq!(Backend::Echo.name(), "echo");
        assert_eq!(Backend::NotifySend.name(), "notify-send");
    }

    #[test]
    fn test_echo_backend_never_fails() {
        let n = Notification::new("Pomodoro", "test");
        assert!(Backend::Echo.send(&n).is_ok());
    }
}
