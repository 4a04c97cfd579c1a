use criterion::{Criterion, black_box, criterion_group, criterion_main};
use retitle_core::{NamingConfig, PartEpisodeMap, RuleCompiler, SeasonMetadata, ShowMetadata};
use retitle_core::range::compile_range;

fn bench_compile_range(c: &mut Criterion) {
    c.bench_function("compile_range_season", |b| {
        b.iter(|| compile_range(black_box(1), black_box(24), black_box(2)));
    });

    c.bench_function("compile_range_long_running", |b| {
        b.iter(|| compile_range(black_box(13), black_box(1084), black_box(4)));
    });

    c.bench_function("compile_range_crossing", |b| {
        b.iter(|| compile_range(black_box(1), black_box(1084), black_box(1)));
    });
}

fn bench_compile_show(c: &mut Criterion) {
    let mut show = ShowMetadata::new(37854, "One Piece", "1999-10-20");
    for season in 1..=20 {
        let first = (season - 1) * 50 + 1;
        show = show.with_season(SeasonMetadata::numbered(season, first, first + 49));
    }

    let uniform = RuleCompiler::new(
        NamingConfig::builder("One Piece")
            .with_pad_zero(true)
            .with_episode_continuous(true)
            .build()
            .unwrap(),
    )
    .unwrap();
    c.bench_function("compile_show_uniform_20_seasons", |b| {
        b.iter(|| uniform.compile_show(black_box(&show)));
    });

    let parts = RuleCompiler::new(
        NamingConfig::builder("One Piece")
            .with_pad_zero(true)
            .with_part_episodes("5:2,9:3,30:2".parse::<PartEpisodeMap>().unwrap())
            .build()
            .unwrap(),
    )
    .unwrap();
    c.bench_function("compile_show_parts_20_seasons", |b| {
        b.iter(|| parts.compile_show(black_box(&show)));
    });
}

criterion_group!(benches, bench_compile_range, bench_compile_show);
criterion_main!(benches);
