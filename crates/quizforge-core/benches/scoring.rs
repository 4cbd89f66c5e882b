use chrono::{DateTime, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizforge_core::model::{DifficultyBreakdown, DifficultyStats};
use quizforge_core::scoring::{analyze_weak_area, compute_summary, score_session};
use quizforge_core::session::SessionSnapshot;
use uuid::Uuid;

fn make_snapshot(easy: (u32, u32), medium: (u32, u32), hard: (u32, u32)) -> SessionSnapshot {
    let tier = |(correct, wrong): (u32, u32)| DifficultyStats { correct, wrong };
    let stats = DifficultyBreakdown {
        easy: tier(easy),
        medium: tier(medium),
        hard: tier(hard),
    };
    let correct = stats.easy.correct + stats.medium.correct + stats.hard.correct;
    let points = stats.easy.correct + 2 * stats.medium.correct + 3 * stats.hard.correct;
    let max_points = stats.easy.answered() + 2 * stats.medium.answered() + 3 * stats.hard.answered();

    SessionSnapshot {
        session_id: Uuid::nil(),
        total_questions: 15,
        answered: stats.total_answered(),
        correct,
        points_earned: points,
        max_points,
        stats,
        early_terminated: stats.total_answered() < 15,
        started_at: DateTime::<Utc>::UNIX_EPOCH,
        finished_at: DateTime::<Utc>::UNIX_EPOCH,
    }
}

fn bench_summary(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_summary");

    group.bench_function("perfect", |b| {
        let snapshot = make_snapshot((5, 0), (5, 0), (5, 0));
        b.iter(|| compute_summary(black_box(&snapshot)))
    });

    group.bench_function("nothing_answered", |b| {
        let snapshot = make_snapshot((0, 0), (0, 0), (0, 0));
        b.iter(|| compute_summary(black_box(&snapshot)))
    });

    group.finish();
}

fn bench_weak_area(c: &mut Criterion) {
    let mut group = c.benchmark_group("weak_area");

    group.bench_function("mixed", |b| {
        let snapshot = make_snapshot((5, 0), (2, 3), (3, 2));
        b.iter(|| analyze_weak_area(black_box(&snapshot.stats)))
    });

    group.bench_function("all_tied", |b| {
        let snapshot = make_snapshot((3, 2), (3, 2), (3, 2));
        b.iter(|| analyze_weak_area(black_box(&snapshot.stats)))
    });

    group.finish();
}

fn bench_score_session(c: &mut Criterion) {
    let snapshot = make_snapshot((4, 1), (2, 3), (1, 4));
    c.bench_function("score_session", |b| {
        b.iter(|| {
            score_session(
                black_box(&snapshot),
                black_box(Some("teacher")),
                DateTime::<Utc>::UNIX_EPOCH,
            )
        })
    });
}

criterion_group!(benches, bench_summary, bench_weak_area, bench_score_session);
criterion_main!(benches);
