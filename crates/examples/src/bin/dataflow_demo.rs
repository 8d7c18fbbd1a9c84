//! Hosts the bounded selection core inside a differential dataflow, showing
//! the stages are independent of the thread-based driver.

use anyhow::Result;
use tracing::info;

use differential_dataflow::input::InputSession;
use differential_dataflow::operators::reduce::Reduce;
use timely::dataflow::operators::probe::Handle as ProbeHandle;

use topn_core::Record;
use topn_runtime::{init_tracing, start_runtime};
use topn_select::BoundedTopSet;

fn main() -> Result<()> {
    init_tracing();
    info!("dataflow_demo starting");

    const TOP_N: usize = 3;
    start_runtime(1, |_index, worker| {
        let mut input: InputSession<_, Record, isize> = InputSession::new();
        let mut probe = ProbeHandle::new();

        worker.dataflow::<u64, _, _>(|scope| {
            let records = input.to_collection(scope);

            // Re-rank the full pool with the same bounded set the batch
            // pipeline uses.
            let topn = records
                .map(|rec| ((), (rec.key, rec.line)))
                .reduce(move |_unit, inputs, output| {
                    let mut set = BoundedTopSet::new(TOP_N);
                    for (value, _count) in inputs.iter() {
                        let (key, line) = (*value).clone();
                        set.insert(Record { key, line });
                    }
                    for rec in set.drain_descending() {
                        output.push(((rec.key, rec.line), 1));
                    }
                });

            topn.inspect(|x| info!(?x, "topn update"))
                .probe_with(&mut probe);
        });

        for key in [5i64, 1, 9, 3, 42, -7, 8, 8] {
            input.insert(Record {
                key,
                line: key.to_string(),
            });
        }
        input.advance_to(1);
        input.flush();
        while probe.less_than(input.time()) {
            worker.step();
        }
    })
}
