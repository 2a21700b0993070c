use crate::eta::EtaSchedule;
use crate::selection::SelectionView;

/// Sink for render instructions produced by the engine.
///
/// The engine never touches a visual tree directly; a web page, a terminal
/// or a test recorder implements this trait instead.
pub trait Presenter {
    /// Redraw the checkpoint panel, hotspot highlights and pager.
    fn render_selection(&mut self, view: &SelectionView);

    /// Draw an ETA table and its summary.
    fn render_schedule(&mut self, schedule: &EtaSchedule);

    /// Ask the operator for a start time after a blank or invalid entry.
    fn prompt_start_time(&mut self);
}

impl<P: Presenter + ?Sized> Presenter for &mut P {
    fn render_selection(&mut self, view: &SelectionView) {
        (**self).render_selection(view);
    }

    fn render_schedule(&mut self, schedule: &EtaSchedule) {
        (**self).render_schedule(schedule);
    }

    fn prompt_start_time(&mut self) {
        (**self).prompt_start_time();
    }
}
