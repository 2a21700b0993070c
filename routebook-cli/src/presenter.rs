use routebook_engine::{EtaSchedule, Presenter, SelectionView};
use std::io::{self, Write};

use crate::reports::{ReportFormat, write_prompt, write_schedule, write_selection};

/// Terminal presenter writing each render instruction in the chosen format.
///
/// The engine's presenter hooks cannot fail, so the first I/O error is kept
/// and returned from [`finish`](Self::finish); later frames are skipped.
pub struct ReportPresenter<W: Write> {
    out: W,
    format: ReportFormat,
    frames: usize,
    error: Option<io::Error>,
}

impl<W: Write> ReportPresenter<W> {
    pub const fn new(out: W, format: ReportFormat) -> Self {
        Self {
            out,
            format,
            frames: 0,
            error: None,
        }
    }

    pub const fn frames(&self) -> usize {
        self.frames
    }

    pub fn finish(self) -> io::Result<W> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.out),
        }
    }

    fn emit(&mut self, write: impl FnOnce(&mut dyn Write, ReportFormat) -> io::Result<()>) {
        if self.error.is_some() {
            return;
        }
        let format = self.format;
        let result = if self.frames > 0 && format == ReportFormat::Console {
            writeln!(self.out).and_then(|()| write(&mut self.out, format))
        } else {
            write(&mut self.out, format)
        };
        match result {
            Ok(()) => self.frames += 1,
            Err(err) => {
                log::error!("failed to write report frame: {err}");
                self.error = Some(err);
            }
        }
    }
}

impl<W: Write> Presenter for ReportPresenter<W> {
    fn render_selection(&mut self, view: &SelectionView) {
        self.emit(|out, format| write_selection(out, format, view));
    }

    fn render_schedule(&mut self, schedule: &EtaSchedule) {
        self.emit(|out, format| write_schedule(out, format, schedule));
    }

    fn prompt_start_time(&mut self) {
        self.emit(write_prompt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use routebook_engine::{Dataset, ExplorerEvent, RouteExplorer};

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn json_frames_are_line_delimited() {
        let presenter = ReportPresenter::new(Vec::new(), ReportFormat::Json);
        let mut explorer = RouteExplorer::new(Dataset::embedded().unwrap(), presenter);
        explorer.start();
        explorer.handle(ExplorerEvent::PointClicked {
            point_id: "quarry".to_string(),
        });
        explorer.handle(ExplorerEvent::RequestEta {
            start_time: Some("06:00".to_string()),
            origin: Some("quarry".to_string()),
        });
        let presenter = explorer.into_presenter();
        assert_eq!(presenter.frames(), 3);
        let bytes = presenter.finish().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let kinds: Vec<String> = text
            .lines()
            .map(|line| {
                let value: serde_json::Value = serde_json::from_str(line).unwrap();
                value["kind"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(kinds, vec!["selection", "selection", "schedule"]);
    }

    #[test]
    fn first_write_error_is_reported_once() {
        let mut presenter = ReportPresenter::new(FailingWriter, ReportFormat::Csv);
        presenter.prompt_start_time();
        presenter.prompt_start_time();
        assert_eq!(presenter.frames(), 0);
        let err = presenter.finish().err().unwrap();
        assert_eq!(err.to_string(), "disk full");
    }
}
