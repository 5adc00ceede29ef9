use crate::error::Result;
use crate::vmon_error;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    X11,
    /// xrandr работает только с XWayland и не меняет настоящие выходы
    Wayland,
    Unknown,
}

/// Проверить, что есть X-дисплей, с которым может работать xrandr
pub fn check_session(dry_run: bool) -> Result<SessionKind> {
    info!("Проверка графической сессии...");

    let display_var = std::env::var("DISPLAY").ok();
    let session_type = std::env::var("XDG_SESSION_TYPE").ok();

    match evaluate_session(display_var.as_deref(), session_type.as_deref()) {
        Ok(kind) => {
            if kind == SessionKind::Wayland {
                warn!("Обнаружена Wayland-сессия: xrandr управляет только выходами XWayland");
            }
            let shown = display_var.as_deref().unwrap_or("");
            info!("Сессия: {:?}, DISPLAY={}", kind, shown);
            Ok(kind)
        }
        Err(e) if dry_run => {
            warn!("{} (игнорируется в dry-run режиме)", e);
            Ok(SessionKind::Unknown)
        }
        Err(e) => Err(e),
    }
}

pub fn evaluate_session(display: Option<&str>, session_type: Option<&str>) -> Result<SessionKind> {
    match display {
        Some(display) if !display.trim().is_empty() => {}
        _ => {
            return Err(vmon_error!(
                service_unavailable,
                "переменная DISPLAY не задана, X-сервер недоступен"
            ))
        }
    }

    Ok(match session_type.map(str::to_lowercase).as_deref() {
        Some("x11") => SessionKind::X11,
        Some("wayland") => SessionKind::Wayland,
        _ => SessionKind::Unknown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VmonError;

    #[test]
    fn test_display_required() {
        assert!(matches!(
            evaluate_session(None, Some("x11")),
            Err(VmonError::ServiceUnavailable(_))
        ));
        assert!(evaluate_session(Some("  "), None).is_err());
    }

    #[test]
    fn test_check_session_in_dry_run_never_fails() {
        // Без DISPLAY dry-run только предупреждает, с DISPLAY возвращает найденный тип
        assert!(check_session(true).is_ok());
    }

    #[test]
    fn test_session_kinds() {
        assert_eq!(evaluate_session(Some(":0"), Some("x11")).unwrap(), SessionKind::X11);
        assert_eq!(evaluate_session(Some(":0"), Some("Wayland")).unwrap(), SessionKind::Wayland);
        assert_eq!(evaluate_session(Some(":1"), None).unwrap(), SessionKind::Unknown);
        assert_eq!(evaluate_session(Some(":1"), Some("tty")).unwrap(), SessionKind::Unknown);
    }
}
