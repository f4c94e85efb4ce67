use ratatui::{Terminal, backend::TestBackend};

use super::*;
use crate::audio::{MediaEvent, MediaEventKind, MediaFailure, ResourceId};
use crate::catalog::Catalog;
use crate::config::Settings;
use crate::i18n::Lang;

fn render(app: &App, player: &Player) -> String {
    let settings = Settings::default();
    let mut terminal = Terminal::new(TestBackend::new(110, 32)).unwrap();
    terminal
        .draw(|f| draw(f, app, player, &settings.ui, &settings.controls))
        .unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect()
}

fn sync(app: &App, player: &mut Player) {
    player.sync(app.session.current_track(), app.session.is_playing());
}

#[test]
fn controls_text_includes_scrub_seconds() {
    let text = controls_text(7);
    assert!(text.contains("[H/L] scrub -/+7s"));
    assert!(text.starts_with("[j/k] up/down"));
}

#[test]
fn transport_title_carries_loading_and_error_labels() {
    let track = Track {
        id: "t1".into(),
        title: "Neon".into(),
        audio_url: "https://a/1.mp3".into(),
        duration: "3:00".into(),
    };
    let mut player = Player::new(false);
    player.sync(Some(&track), true);
    let strings = Lang::En.strings();
    assert_eq!(
        transport_title(&track, &player.status(), strings),
        "Neon (Loading...)"
    );

    player.handle_event(MediaEvent::new(
        ResourceId(1),
        MediaEventKind::Failed(MediaFailure::Load("gone".into())),
    ));
    assert_eq!(
        transport_title(&track, &player.status(), Lang::Ru.strings()),
        "Neon (Ошибка)"
    );
}

#[test]
fn transport_bar_appears_only_with_a_current_track() {
    let mut app = App::new(Catalog::bundled().unwrap(), Lang::En);
    let mut player = Player::new(false);

    let screen = render(&app, &player);
    assert!(screen.contains("Discography"));
    assert!(!screen.contains("now playing"));

    app.play_release(0);
    sync(&app, &mut player);
    let screen = render(&app, &player);
    assert!(screen.contains("now playing"));
    assert!(screen.contains("DANVIR //"));
    assert!(screen.contains("0:00 /"));
}

#[test]
fn details_popup_lists_links_or_placeholder() {
    let mut app = App::new(Catalog::bundled().unwrap(), Lang::En);
    let player = Player::new(false);
    app.toggle_details_window();

    let screen = render(&app, &player);
    assert!(screen.contains("K closes"));
    assert!(screen.contains("Listen on") || screen.contains("No platform links yet"));
}
