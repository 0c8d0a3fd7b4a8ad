use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use toast_dedup::{DeferredQueue, NotificationId, SystemClock, ToastDeduplicator};

fn toasts() -> (ToastDeduplicator, Arc<DeferredQueue>) {
    let queue = Arc::new(DeferredQueue::new(Arc::new(SystemClock::new())));
    (ToastDeduplicator::with_scheduler(queue.clone()), queue)
}

/// Benchmark the suppressed path: one id triggered over and over
fn bench_suppressed_trigger(c: &mut Criterion) {
    let mut group = c.benchmark_group("suppressed");
    group.throughput(Throughput::Elements(1000));

    group.bench_function("same_id", |b| {
        let (toasts, _queue) = toasts();
        let id = NotificationId::from("toast-1");

        b.iter(|| {
            for _ in 0..1000 {
                toasts.trigger(|| black_box(()), black_box(id.clone()));
            }
        })
    });

    group.finish();
}

/// Benchmark the firing path: every trigger uses a fresh id
fn bench_fired_trigger(c: &mut Criterion) {
    let mut group = c.benchmark_group("fired");

    for count in [100_usize, 1_000, 10_000].iter() {
        let ids: Vec<NotificationId> = (0..*count)
            .map(|i| NotificationId::from(format!("toast-{}", i)))
            .collect();
        group.throughput(Throughput::Elements(*count as u64));

        group.bench_with_input(BenchmarkId::new("distinct_ids", count), &ids, |b, ids| {
            b.iter(|| {
                let (toasts, _queue) = toasts();
                for id in ids {
                    toasts.trigger(|| black_box(()), id.clone());
                }
            })
        });
    }

    group.finish();
}

/// Benchmark multi-threaded contention on a single id
fn bench_concurrent_trigger(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent");

    for num_threads in [2, 4, 8].iter() {
        group.throughput(Throughput::Elements((*num_threads as u64) * 1000));

        group.bench_with_input(
            BenchmarkId::new("threads", num_threads),
            num_threads,
            |b, &num_threads| {
                b.iter(|| {
                    let (toasts, _queue) = toasts();

                    let handles: Vec<_> = (0..num_threads)
                        .map(|_| {
                            let toasts = toasts.clone();
                            std::thread::spawn(move || {
                                for _ in 0..1000 {
                                    toasts.trigger(|| black_box(()), "shared");
                                }
                            })
                        })
                        .collect();

                    for handle in handles {
                        handle.join().unwrap();
                    }
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_suppressed_trigger,
    bench_fired_trigger,
    bench_concurrent_trigger
);
criterion_main!(benches);
