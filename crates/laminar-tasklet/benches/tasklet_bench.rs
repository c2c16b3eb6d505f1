//! Tasklet throughput benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use laminar_tasklet::testing::PassThroughProcessor;
use laminar_tasklet::{
    InboundEdge, Inbox, OutboundEdge, ProcessorContext, ProcessorTasklet, ProgressState, Result,
    Tasklet, TaskletConfig,
};

const EVENTS: u64 = 100_000;

/// Inbound edge producing `0..remaining` as fast as the inbox accepts.
struct CountingInbound {
    ordinal: usize,
    next: u64,
    end: u64,
}

impl InboundEdge<u64> for CountingInbound {
    fn ordinal(&self) -> usize {
        self.ordinal
    }

    fn priority(&self) -> i32 {
        0
    }

    fn drain_into(&mut self, inbox: &mut Inbox<u64>) -> Result<ProgressState> {
        let start = self.next;
        while self.next < self.end && inbox.push(self.next).is_ok() {
            self.next += 1;
        }
        Ok(ProgressState::from_flags(
            self.next > start,
            self.next == self.end,
        ))
    }
}

/// Outbound edge that accepts and discards everything.
struct SinkOutbound {
    ordinal: usize,
}

impl OutboundEdge<u64> for SinkOutbound {
    fn ordinal(&self) -> usize {
        self.ordinal
    }

    fn offer(&mut self, item: &u64) -> Result<ProgressState> {
        black_box(item);
        Ok(ProgressState::Done)
    }

    fn close(&mut self) -> Result<ProgressState> {
        Ok(ProgressState::Done)
    }
}

fn pipeline(inputs: usize, outputs: usize) -> ProcessorTasklet<u64> {
    let per_input = EVENTS / inputs as u64;
    let instreams: Vec<Box<dyn InboundEdge<u64>>> = (0..inputs)
        .map(|ordinal| {
            Box::new(CountingInbound {
                ordinal,
                next: 0,
                end: per_input,
            }) as Box<dyn InboundEdge<u64>>
        })
        .collect();
    let outstreams: Vec<Box<dyn OutboundEdge<u64>>> = (0..outputs)
        .map(|ordinal| Box::new(SinkOutbound { ordinal }) as Box<dyn OutboundEdge<u64>>)
        .collect();
    let mut tasklet = ProcessorTasklet::new(
        ProcessorContext::new("bench", 0),
        Box::new(PassThroughProcessor::<u64>::new()),
        instreams,
        outstreams,
        &TaskletConfig::default(),
    )
    .unwrap();
    tasklet.init().unwrap();
    tasklet
}

fn run_to_completion(tasklet: &mut ProcessorTasklet<u64>) -> u64 {
    let mut invocations = 0;
    while tasklet.invoke().unwrap() != ProgressState::Done {
        invocations += 1;
    }
    invocations
}

fn bench_pass_through(c: &mut Criterion) {
    let mut group = c.benchmark_group("tasklet_pass_through");
    group.throughput(Throughput::Elements(EVENTS));

    for (inputs, outputs) in [(1, 1), (4, 1), (1, 4)] {
        group.bench_with_input(
            BenchmarkId::new("edges", format!("{inputs}x{outputs}")),
            &(inputs, outputs),
            |b, &(inputs, outputs)| {
                b.iter_batched(
                    || pipeline(inputs, outputs),
                    |mut tasklet| black_box(run_to_completion(&mut tasklet)),
                    criterion::BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

fn bench_idle_invoke(c: &mut Criterion) {
    let mut group = c.benchmark_group("tasklet_idle");

    group.bench_function("invoke_after_done", |b| {
        let mut tasklet = pipeline(1, 1);
        run_to_completion(&mut tasklet);
        b.iter(|| black_box(tasklet.invoke().unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_pass_through, bench_idle_invoke);
criterion_main!(benches);
