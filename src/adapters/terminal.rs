use crate::core::gauge::render_panel;
use crate::domain::frame::{Frame, PanelState};
use crate::domain::ports::Dashboard;
use crate::utils::error::Result;
use std::io::Write;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Writes each frame as plain text, optionally redrawing the screen.
pub struct TerminalDashboard<W: Write + Send> {
    out: W,
    bar_width: usize,
    redraw: bool,
}

impl TerminalDashboard<std::io::Stdout> {
    pub fn stdout(bar_width: usize) -> Self {
        Self::new(std::io::stdout(), bar_width, true)
    }
}

impl<W: Write + Send> TerminalDashboard<W> {
    pub fn new(out: W, bar_width: usize, redraw: bool) -> Self {
        Self {
            out,
            bar_width,
            redraw,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Dashboard for TerminalDashboard<W> {
    fn render(&mut self, frame: &Frame) -> Result<()> {
        if self.redraw {
            write!(self.out, "{}", CLEAR_SCREEN)?;
        }

        let ranked = frame.panels.len() > 1;
        for (i, panel) in frame.panels.iter().enumerate() {
            if let PanelState::Gauge(_) = panel.state {
                if ranked {
                    writeln!(self.out, "{}. {}", i + 1, panel.query)?;
                } else {
                    writeln!(self.out, "{}", panel.query)?;
                }
                writeln!(self.out, "   {}", render_panel(panel, self.bar_width))?;
            } else {
                writeln!(self.out, "{}", render_panel(panel, self.bar_width))?;
            }
        }
        writeln!(self.out, "Last updated: {}", frame.updated_at)?;
        self.out.flush()?;
        Ok(())
    }
}

/// One JSON object per frame, for piping into other tools.
pub struct JsonDashboard<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> JsonDashboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Dashboard for JsonDashboard<W> {
    fn render(&mut self, frame: &Frame) -> Result<()> {
        serde_json::to_writer(&mut self.out, frame)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Pick the text or JSON dashboard on stdout.
pub fn stdout_dashboard(json: bool, bar_width: usize) -> Box<dyn Dashboard> {
    if json {
        Box::new(JsonDashboard::new(std::io::stdout()))
    } else {
        Box::new(TerminalDashboard::stdout(bar_width))
    }
}
