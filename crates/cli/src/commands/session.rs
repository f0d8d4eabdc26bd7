//! Line-driven session over one widget.
//!
//! Each stdin line is one gesture; the widget is re-rendered after every
//! line. Failed gestures are shown in the widget's error banner and the
//! session carries on.
//!
//! ```text
//! filter Sh
//! remove p1
//! user u2
//! render
//! ```

use tokio::io::{AsyncBufReadExt, BufReader};
use usercart_core::{ItemId, UserId};
use usercart_storefront::{CartTransport, UserCartView, ViewError, WidgetConfig};

/// A single session gesture.
#[derive(Debug, PartialEq, Eq)]
pub enum Gesture {
    Filter(String),
    Remove(ItemId),
    User(UserId),
    Refresh,
    Render,
}

/// Parse one input line. Blank lines and unknown words yield `None`.
///
/// `filter` keeps the rest of the line verbatim, so `filter` alone clears
/// the filter.
pub fn parse_gesture(line: &str) -> Option<Gesture> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));

    match word {
        "filter" => Some(Gesture::Filter(rest.to_owned())),
        "remove" => ItemId::parse(rest).ok().map(Gesture::Remove),
        "user" => UserId::parse(rest).ok().map(Gesture::User),
        "refresh" => Some(Gesture::Refresh),
        "render" => Some(Gesture::Render),
        _ => None,
    }
}

/// Bind `user`, then apply gestures from stdin until EOF.
///
/// # Errors
///
/// Fails if stdin or stdout cannot be used, or if the widget cannot render.
/// Gesture failures are not fatal.
pub async fn run(config: &WidgetConfig, user: UserId) -> Result<(), Box<dyn std::error::Error>> {
    let mut view = super::build_view(config)?;
    report(view.set_user_id(user).await.map(|_| ()));
    super::emit(&view.render()?)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(gesture) = parse_gesture(&line) else {
            if !line.trim().is_empty() {
                tracing::warn!(%line, "Unrecognized command");
            }
            continue;
        };
        apply(&mut view, gesture).await;
        super::emit(&view.render()?)?;
    }

    Ok(())
}

async fn apply<T: CartTransport>(view: &mut UserCartView<T>, gesture: Gesture) {
    match gesture {
        Gesture::Filter(term) => view.filter_items(&term),
        Gesture::Remove(item_id) => report(view.remove(&item_id).await.map(|_| ())),
        Gesture::User(user_id) => report(view.set_user_id(user_id).await.map(|_| ())),
        Gesture::Refresh => report(view.refresh().await.map(|_| ())),
        Gesture::Render => {}
    }
}

fn report(result: Result<(), ViewError>) {
    if let Err(e) = result {
        tracing::warn!(error = %e, "Command failed");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter_keeps_spaces() {
        assert_eq!(
            parse_gesture("filter Red Sh"),
            Some(Gesture::Filter("Red Sh".to_owned()))
        );
        assert_eq!(parse_gesture("filter"), Some(Gesture::Filter(String::new())));
    }

    #[test]
    fn test_parse_ids() {
        assert_eq!(
            parse_gesture("remove p1"),
            Some(Gesture::Remove(ItemId::from("p1")))
        );
        assert_eq!(
            parse_gesture("user u2\r\n"),
            Some(Gesture::User(UserId::from("u2")))
        );
    }

    #[test]
    fn test_parse_rejects_missing_ids() {
        assert_eq!(parse_gesture("remove"), None);
        assert_eq!(parse_gesture("user   "), None);
    }

    #[test]
    fn test_parse_other_lines() {
        assert_eq!(parse_gesture("render"), Some(Gesture::Render));
        assert_eq!(parse_gesture("refresh"), Some(Gesture::Refresh));
        assert_eq!(parse_gesture(""), None);
        assert_eq!(parse_gesture("checkout"), None);
    }
}
