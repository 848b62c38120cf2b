use std::sync::{Arc, Mutex, PoisonError};

use triple_buffer::TripleBuffer;

use crate::AnalysisResult;

/// Writing side of the published [AnalysisResult]s. There's only one writer.
pub struct AnalysisPublisher {
    input: triple_buffer::Input<AnalysisResult>,
}

impl AnalysisPublisher {
    /// Creates the publisher and the first reader. Readers see `initial` until the first
    /// [AnalysisPublisher::publish].
    pub fn new(initial: &AnalysisResult) -> (Self, AnalysisReader) {
        let (input, output) = TripleBuffer::new(initial).split();

        let reader = AnalysisReader {
            output: Arc::new(Mutex::new(output)),
        };

        (Self { input }, reader)
    }

    /// Replaces the published result as a whole.
    pub fn publish(&mut self, result: AnalysisResult) {
        self.input.write(result);
    }
}

/// Reading side of the published [AnalysisResult]s.
///
/// Clone it to hand it to as many consumers (or threads) as you need. A reader always sees a
/// complete result of one frame.
#[derive(Clone)]
pub struct AnalysisReader {
    output: Arc<Mutex<triple_buffer::Output<AnalysisResult>>>,
}

impl AnalysisReader {
    /// Returns the latest published result.
    pub fn read(&self) -> AnalysisResult {
        let mut output = self.output.lock().unwrap_or_else(PoisonError::into_inner);
        output.read().clone()
    }
}
