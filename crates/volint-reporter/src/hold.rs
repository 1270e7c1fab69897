use crate::Reporter;
use volint_codes::Report;

/// A reporter that buffers everything it is given.
///
/// Used where a second producer would otherwise need concurrent access to
/// the shared reporter: the producer accumulates here and the buffer is
/// later replayed, in receipt order, into the real reporter. Replay drains
/// the buffer.
#[derive(Default)]
pub struct HoldReporter {
    held: Vec<Report>,
}

impl HoldReporter {
    pub fn new() -> HoldReporter {
        HoldReporter::default()
    }

    pub fn len(&self) -> usize {
        self.held.len()
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    /// Replays every held report into `target`, oldest first, emptying
    /// this buffer.
    pub fn replay_into(&mut self, target: &mut dyn Reporter) {
        for report in self.held.drain(..) {
            target.submit(report);
        }
    }
}

impl Reporter for HoldReporter {
    fn submit(&mut self, report: Report) {
        self.held.push(report);
    }

    fn current_section(&self) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OutputReporter, ReporterExt};
    use volint_codes::FixedCode;

    #[test]
    fn replay_preserves_receipt_order_and_drains() {
        let mut hold = HoldReporter::new();
        hold.report(FixedCode::NoContentType, "first");
        hold.report(FixedCode::MissingMandatoryDocument, "second");
        assert_eq!(hold.len(), 2);

        let mut out = OutputReporter::new(Vec::new());
        hold.replay_into(&mut out);
        assert!(hold.is_empty());

        let text = String::from_utf8(out.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["W-NOCT-0 first", "E-GONM-0 second"]);
    }
}
