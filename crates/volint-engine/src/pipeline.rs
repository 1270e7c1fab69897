//! The stage contract and the sequential pipeline driver.

use crate::context::ServiceContext;
use std::io::Write;
use volint_codes::FixedCode;
use volint_reporter::{OutputReporter, Reporter, ReporterExt};

/// One independent conformance check against a service.
///
/// Stages share no mutable state with each other: everything they learn
/// goes through the reporter, everything they read comes from the immutable
/// service context (or their own fields).
pub trait Stage {
    /// Short code used as the section identifier for this stage's reports.
    fn code(&self) -> &'static str;

    /// One-line description, imperative mood.
    fn description(&self) -> &'static str;

    /// Performs the check. An `Err` marks an unexpected fault; expected
    /// findings are reported, not returned.
    fn run(&mut self, reporter: &mut dyn Reporter, ctx: &ServiceContext) -> anyhow::Result<()>;
}

/// Runs stages strictly in the given order.
///
/// Each stage gets its own section. A stage fault becomes exactly one
/// FAILURE report naming the stage, and the pipeline moves on to the next
/// stage: partial results beat no results. After each section closes, the
/// suppressed-message summary for that section is flushed.
pub fn run_stages<W: Write>(
    reporter: &mut OutputReporter<W>,
    ctx: &ServiceContext,
    stages: &mut [Box<dyn Stage>],
) {
    for stage in stages.iter_mut() {
        reporter.start_section(stage.code(), stage.description());
        if let Err(fault) = stage.run(reporter, ctx) {
            reporter.report_with_cause(
                FixedCode::StageFault,
                &format!("Stage {} did not complete", stage.code()),
                fault,
            );
        }
        reporter.end_section();
        reporter.summarise_unreported(Some(stage.code()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubFetcher, context_with};
    use volint_codes::FixedCode;

    struct NoisyStage {
        code: &'static str,
        fail: bool,
    }

    impl Stage for NoisyStage {
        fn code(&self) -> &'static str {
            self.code
        }

        fn description(&self) -> &'static str {
            "Make some noise"
        }

        fn run(
            &mut self,
            reporter: &mut dyn Reporter,
            _ctx: &ServiceContext,
        ) -> anyhow::Result<()> {
            reporter.report(FixedCode::NoContentType, "before the trouble");
            if self.fail {
                anyhow::bail!("endpoint exploded");
            }
            Ok(())
        }
    }

    #[test]
    fn fault_in_one_stage_does_not_stop_the_next() {
        let ctx = context_with(StubFetcher::new());
        let mut reporter = OutputReporter::new(Vec::new());
        let mut stages: Vec<Box<dyn Stage>> = vec![
            Box::new(NoisyStage {
                code: "BAD",
                fail: true,
            }),
            Box::new(NoisyStage {
                code: "OKY",
                fail: false,
            }),
        ];
        run_stages(&mut reporter, &ctx, &mut stages);

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        let failures: Vec<&str> = text.lines().filter(|l| l.starts_with("F-")).collect();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].starts_with("F-BAD-UNEX-0 Stage BAD did not complete"));
        assert!(failures[0].contains("endpoint exploded"));
        // The second stage still ran and reported under its own section.
        assert!(text.contains("Section OKY: Make some noise"));
        assert!(text.contains("W-OKY-NOCT-0 before the trouble"));
    }

    #[test]
    fn sections_open_in_caller_order() {
        let ctx = context_with(StubFetcher::new());
        let mut reporter = OutputReporter::new(Vec::new());
        let mut stages: Vec<Box<dyn Stage>> = vec![
            Box::new(NoisyStage {
                code: "AAA",
                fail: false,
            }),
            Box::new(NoisyStage {
                code: "BBB",
                fail: false,
            }),
        ];
        run_stages(&mut reporter, &ctx, &mut stages);

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        let first = text.find("Section AAA").unwrap();
        let second = text.find("Section BBB").unwrap();
        assert!(first < second);
    }
}
