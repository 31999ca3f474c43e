use folio_page::{
    LoadingController, LoadingEvent, LoadingPhase, MemoryStage, PageConfig, ScriptedProgress,
    Stage, StageLayout,
};
use folio_api_core::{Property, TargetPath, Value};

fn portfolio_stage() -> MemoryStage {
    let layout: StageLayout = folio_test_fixtures::stages::load("portfolio").unwrap();
    MemoryStage::from_layout(&layout)
}

fn run(ctl: &mut LoadingController, stage: &mut MemoryStage, ticks: usize) -> Vec<LoadingEvent> {
    (0..ticks).flat_map(|_| ctl.tick(0.1, stage)).collect()
}

/// it should clamp an overshooting increment to 100 and complete exactly once
#[test]
fn overshoot_clamps_and_completes_once() {
    let cfg = PageConfig::portfolio();
    let mut stage = portfolio_stage();
    let src = ScriptedProgress::new([92.0, 12.0]);
    let mut ctl = LoadingController::new(cfg.loading, &cfg.motion, &mut stage)
        .unwrap()
        .with_progress_source(Box::new(src));

    let events = run(&mut ctl, &mut stage, 100);
    let progress: Vec<f32> = events
        .iter()
        .filter_map(|e| match e {
            LoadingEvent::Progress(p) => Some(*p),
            LoadingEvent::Completed => None,
        })
        .collect();
    assert_eq!(progress, vec![92.0, 100.0]);
    let completions = events.iter().filter(|e| **e == LoadingEvent::Completed).count();
    assert_eq!(completions, 1);
    assert_eq!(ctl.phase(), LoadingPhase::Done);
    assert_eq!(ctl.progress(), 100.0);

    let pct = TargetPath::parse("preloader/percentage").unwrap();
    assert_eq!(stage.value(&pct, Property::Text), Some(&Value::text("100%")));
    let bar = TargetPath::parse("preloader/bar").unwrap();
    assert_eq!(stage.read(&bar, Property::Width), Some(Value::Float(100.0)));
}

/// it should never report decreasing progress
#[test]
fn progress_is_monotonic() {
    let cfg = PageConfig::portfolio();
    let mut stage = portfolio_stage();
    let src = ScriptedProgress::new([5.0, 0.0, 14.9, -3.0, 7.5]).then(10.0);
    let mut ctl = LoadingController::new(cfg.loading, &cfg.motion, &mut stage)
        .unwrap()
        .with_progress_source(Box::new(src));

    let mut last = 0.0;
    for event in run(&mut ctl, &mut stage, 60) {
        if let LoadingEvent::Progress(p) = event {
            assert!(p >= last, "{p} < {last}");
            assert!(p <= 100.0);
            last = p;
        }
    }
    assert_eq!(last, 100.0);
}

/// it should hold the exit until the wait has passed, then fade the preloader out
#[test]
fn exit_runs_after_wait() {
    let cfg = PageConfig::portfolio();
    let mut stage = portfolio_stage();
    let src = ScriptedProgress::new([100.0]);
    let mut ctl = LoadingController::new(cfg.loading, &cfg.motion, &mut stage)
        .unwrap()
        .with_progress_source(Box::new(src));

    run(&mut ctl, &mut stage, 4);
    assert_eq!(ctl.phase(), LoadingPhase::Completing);
    let root = TargetPath::parse("preloader").unwrap();
    assert_eq!(stage.read(&root, Property::Opacity), Some(Value::Float(1.0)));

    run(&mut ctl, &mut stage, 30);
    assert!(ctl.is_done());
    assert_eq!(stage.read(&root, Property::Opacity), Some(Value::Float(0.0)));
}

/// it should stop ticking and writing once cancelled mid-run
#[test]
fn cancel_stops_the_interval() {
    let cfg = PageConfig::portfolio();
    let mut stage = portfolio_stage();
    let src = ScriptedProgress::new([]).then(10.0);
    let mut ctl = LoadingController::new(cfg.loading, &cfg.motion, &mut stage)
        .unwrap()
        .with_progress_source(Box::new(src));
    run(&mut ctl, &mut stage, 3);
    let before = ctl.progress();
    ctl.cancel();
    stage.take_writes();

    assert!(run(&mut ctl, &mut stage, 50).is_empty());
    assert_eq!(ctl.progress(), before);
    assert!(stage.writes().is_empty());
}
