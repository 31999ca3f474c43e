use criterion::{black_box, criterion_group, criterion_main, Criterion};
use folio_motion::{
    AnimationStep, Ease, MemoryStage, Property, Stagger, StyleMap, TargetPath, TimelineBuilder,
};

fn bench_cascade(c: &mut Criterion) {
    let group = TargetPath::parse("about/skill-item").unwrap();
    let members: Vec<TargetPath> = (0..64).map(|i| group.member(i)).collect();
    let template = AnimationStep::from_to(
        group.clone(),
        StyleMap::new()
            .with(Property::Opacity, 0.0)
            .with(Property::Scale, 0.8)
            .with(Property::Y, 20.0),
        StyleMap::new()
            .with(Property::Opacity, 1.0)
            .with(Property::Scale, 1.0)
            .with(Property::Y, 0.0),
        0.5,
    )
    .with_ease(Ease::parse("back.out(1.7)").unwrap());

    c.bench_function("timeline_tick_64_members", |b| {
        let mut stage = MemoryStage::new();
        stage.insert_group(&group, members.len());
        let mut tl = TimelineBuilder::new()
            .stagger(&members, &template, Stagger::Overlap { overlap: 0.8, decay: 0.01 })
            .build()
            .unwrap();
        tl.render(&mut stage);
        b.iter(|| {
            if tl.progress() >= 1.0 {
                tl.reverse();
            } else if tl.progress() <= 0.0 {
                tl.play();
            }
            let events = tl.tick(black_box(1.0 / 60.0), &mut stage);
            black_box(stage.take_writes());
            black_box(events);
        });
    });
}

criterion_group!(benches, bench_cascade);
criterion_main!(benches);
