use folio_api_core::{Property, TargetPath, Value};
use folio_motion::Config as MotionConfig;
use folio_page::{
    MemoryStage, PageComposer, PageConfig, PageEvent, PageFrame, PagePhase, ScriptedProgress,
    SectionController, Stage, StageLayout, Viewport,
};

fn tp(s: &str) -> TargetPath {
    TargetPath::parse(s).unwrap()
}

fn portfolio_stage() -> MemoryStage {
    let layout: StageLayout = folio_test_fixtures::stages::load("portfolio").unwrap();
    MemoryStage::from_layout(&layout)
}

fn loaded_page(stage: &mut MemoryStage) -> (PageComposer, Vec<PageFrame>) {
    let mut page = PageComposer::new(PageConfig::portfolio())
        .unwrap()
        .with_progress_source(Box::new(ScriptedProgress::new([100.0])));
    let mut frames = Vec::new();
    for _ in 0..60 {
        frames.push(page.tick(0.1, stage).unwrap());
    }
    (page, frames)
}

/// it should load the portfolio fixture as exactly the built-in page
#[test]
fn fixture_matches_builtin_page() {
    let from_fixture: PageConfig = folio_test_fixtures::pages::load("portfolio").unwrap();
    assert_eq!(from_fixture, PageConfig::portfolio());
    let json = folio_test_fixtures::pages::json("portfolio").unwrap();
    assert!(PageComposer::from_json(&json).is_ok());
}

/// it should keep the page locked while loading, then mount every section in order
#[test]
fn loading_gates_sections() {
    let mut stage = portfolio_stage();
    let (page, frames) = loaded_page(&mut stage);

    let done_at = frames
        .iter()
        .position(|f| f.events.contains(&PageEvent::LoadingComplete))
        .expect("loading completes");
    assert!(frames[..done_at].iter().all(|f| f.scroll_locked && f.phase == PagePhase::Loading));
    assert!(frames[done_at..].iter().all(|f| !f.scroll_locked && f.phase == PagePhase::Ready));
    let epochs: Vec<u64> = frames.iter().map(|f| f.epoch).collect();
    assert_eq!(epochs, (1..=60).collect::<Vec<_>>());

    let ids: Vec<&str> = page.sections().iter().map(|s| s.id()).collect();
    assert_eq!(ids, ["hero", "about", "projects", "contact", "footer"]);

    let removed_at = frames
        .iter()
        .position(|f| f.events.contains(&PageEvent::PreloaderRemoved))
        .expect("preloader removed");
    // 1 s at 0.1 s per frame.
    assert_eq!(removed_at - done_at, 10);
    assert!(page.loading().is_none());
}

/// it should play the hero on mount and leave scroll sections at their from-state
#[test]
fn hero_plays_and_about_waits() {
    let mut stage = portfolio_stage();
    let (_page, _) = loaded_page(&mut stage);

    // Hero delay 0.5 s, duration 2.5 s; well past both by now.
    assert_eq!(stage.read(&tp("hero/headline"), Property::Opacity), Some(Value::Float(1.0)));
    assert_eq!(stage.read(&tp("hero/spline"), Property::X), Some(Value::Float(0.0)));
    assert_eq!(stage.read(&tp("about/image"), Property::Opacity), Some(Value::Float(0.0)));
    assert_eq!(stage.read(&tp("about/skill-item[7]"), Property::Scale), Some(Value::Float(0.8)));
}

/// it should activate only the sections whose start marker the viewport passed
#[test]
fn scroll_activates_about() {
    let mut stage = portfolio_stage();
    let (mut page, _) = loaded_page(&mut stage);

    let events = page.on_scroll(Viewport::new(300.0, 800.0), &stage);
    assert_eq!(
        events,
        vec![
            PageEvent::NavScrolled { scrolled: true },
            PageEvent::SectionActivated { id: "about".into() },
        ]
    );
    for _ in 0..30 {
        page.tick(0.1, &mut stage).unwrap();
    }
    assert_eq!(stage.read(&tp("about/image"), Property::Opacity), Some(Value::Float(1.0)));
    assert_eq!(stage.read(&tp("about/skill-item[7]"), Property::Scale), Some(Value::Float(1.0)));
    // Parallax: 300 px into the hero's 800 px scrub range.
    assert_eq!(stage.read(&tp("hero/spline"), Property::Y), Some(Value::Float(37.5)));

    let events = page.on_scroll(Viewport::new(0.0, 800.0), &stage);
    assert_eq!(
        events,
        vec![
            PageEvent::NavScrolled { scrolled: false },
            PageEvent::SectionDeactivated { id: "about".into() },
        ]
    );
    for _ in 0..30 {
        page.tick(0.1, &mut stage).unwrap();
    }
    assert_eq!(stage.read(&tp("about/image"), Property::Opacity), Some(Value::Float(0.0)));
}

/// it should apply a scroll sample taken during loading once the sections mount
#[test]
fn scroll_during_loading_is_replayed() {
    let mut stage = portfolio_stage();
    let mut page = PageComposer::new(PageConfig::portfolio())
        .unwrap()
        .with_progress_source(Box::new(ScriptedProgress::new([100.0])));
    page.tick(0.1, &mut stage).unwrap();
    page.on_scroll(Viewport::new(300.0, 800.0), &stage);

    let mut activated = false;
    for _ in 0..30 {
        let frame = page.tick(0.1, &mut stage).unwrap();
        activated |= frame
            .events
            .contains(&PageEvent::SectionActivated { id: "about".into() });
    }
    assert!(activated);
}

/// it should never write from a section unmounted before its trigger fired
#[test]
fn unmounted_before_trigger_never_writes() {
    let mut stage = portfolio_stage();
    let cfg = PageConfig::portfolio();
    let spec = cfg.section("projects").unwrap();
    let mut section = SectionController::mount(spec, &mut stage, &MotionConfig::default()).unwrap();
    section.unmount();
    stage.remove_section("projects");
    stage.take_writes();

    for y in [0.0, 1200.0, 2000.0, 1200.0, 2000.0] {
        assert_eq!(section.on_scroll(&Viewport::new(y, 800.0), &stage), None);
        section.tick(0.1, &mut stage);
    }
    assert!(stage.writes().is_empty());
    assert_eq!(stage.rejected_writes(), 0);
}

/// it should drop the scroll lock and silence every section on unmount
#[test]
fn page_unmount_cleans_up() {
    let mut stage = portfolio_stage();
    let mut page = PageComposer::new(PageConfig::portfolio())
        .unwrap()
        .with_progress_source(Box::new(ScriptedProgress::new([100.0])));
    let lock = page.scroll_lock();
    page.tick(0.1, &mut stage).unwrap();
    assert!(lock.is_locked());

    page.unmount();
    assert!(!lock.is_locked());
    stage.take_writes();
    for _ in 0..20 {
        let frame = page.tick(0.1, &mut stage).unwrap();
        assert!(frame.events.is_empty());
        assert_eq!(frame.phase, PagePhase::Unmounted);
    }
    assert!(page.on_scroll(Viewport::new(900.0, 800.0), &stage).is_empty());
    assert!(stage.writes().is_empty());
}

/// it should close the menu and report the section's offset when navigating
#[test]
fn navigate_closes_menu() {
    let mut stage = portfolio_stage();
    let (mut page, _) = loaded_page(&mut stage);
    assert!(page.toggle_menu());
    let req = page.navigate("projects", &stage).unwrap();
    assert_eq!(req.y, Some(1700.0));
    assert!(!page.navigation().is_menu_open());

    let frame = page.tick(0.1, &mut stage).unwrap();
    assert_eq!(frame.events.len(), 2);
    assert_eq!(frame.events[0], PageEvent::MenuToggled { open: true });
    assert!(matches!(&frame.events[1], PageEvent::ScrollRequested { request } if request == &req));
}

/// it should detach the whole preloader subtree once the removal event fires
#[test]
fn preloader_removal_detaches_children() {
    let mut stage = portfolio_stage();
    let mut page = PageComposer::new(PageConfig::portfolio())
        .unwrap()
        .with_progress_source(Box::new(ScriptedProgress::new([100.0])));
    let root = page.config().loading.root.clone();
    let mut removed = false;
    for _ in 0..80 {
        let frame = page.tick(0.1, &mut stage).unwrap();
        if frame.events.contains(&PageEvent::PreloaderRemoved) {
            removed = stage.remove(&root);
        }
    }
    assert!(removed);
    for path in ["preloader", "preloader/logo", "preloader/track", "preloader/bar", "preloader/percentage"] {
        assert!(!stage.contains(&tp(path)), "{path} still attached");
    }
    assert!(stage.contains(&tp("hero/headline")));
    assert!(stage.contains(&tp("footer/particle[19]")));
}
