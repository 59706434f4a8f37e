use crate::export::sheet::{report_sheets, Sheet, NULL_CELL};
use crate::model::{Element, ThermalReport};
use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{DefaultTerminal, Frame};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View {
    Sheets,
    ElementDetail,
}

pub struct App {
    pub report: ThermalReport,
    pub sheets: Vec<Sheet>,
    pub view: View,
    pub selected_sheet: usize,
    pub selected_row: usize,
    pub detail_scroll_offset: usize,
    pub should_quit: bool,
}

impl App {
    #[must_use]
    pub fn new(report: ThermalReport) -> Self {
        let sheets = report_sheets(&report);
        Self {
            report,
            sheets,
            view: View::Sheets,
            selected_sheet: 0,
            selected_row: 0,
            detail_scroll_offset: 0,
            should_quit: false,
        }
    }

    pub fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            self.handle_events()?;
        }
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        match self.view {
            View::Sheets => super::dashboard::draw_report(frame, self),
            View::ElementDetail => super::dashboard::draw_element_detail(frame, self),
        }
    }

    fn handle_events(&mut self) -> Result<()> {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            match self.view {
                View::Sheets => self.handle_sheet_keys(key.code),
                View::ElementDetail => self.handle_detail_keys(key.code),
            }
        }
        Ok(())
    }

    pub fn handle_sheet_keys(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.previous_row(),
            KeyCode::Down | KeyCode::Char('j') => self.next_row(),
            KeyCode::Left | KeyCode::Char('h') => self.previous_sheet(),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => self.next_sheet(),
            KeyCode::Enter => self.enter_element_detail(),
            _ => {}
        }
    }

    pub fn handle_detail_keys(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Enter => {
                self.view = View::Sheets;
                self.detail_scroll_offset = 0;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.detail_scroll_offset = self.detail_scroll_offset.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let max = self.detail_rows().len().saturating_sub(1);
                if self.detail_scroll_offset < max {
                    self.detail_scroll_offset += 1;
                }
            }
            _ => {}
        }
    }

    /// Wraps around to the last sheet
    fn previous_sheet(&mut self) {
        self.selected_sheet = if self.selected_sheet == 0 {
            self.sheets.len().saturating_sub(1)
        } else {
            self.selected_sheet - 1
        };
        self.selected_row = 0;
    }

    /// Wraps around to the first sheet
    fn next_sheet(&mut self) {
        self.selected_sheet = if self.selected_sheet + 1 >= self.sheets.len() {
            0
        } else {
            self.selected_sheet + 1
        };
        self.selected_row = 0;
    }

    fn previous_row(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
    }

    fn next_row(&mut self) {
        let count = self.current_sheet().map_or(0, |s| s.rows.len());
        if self.selected_row < count.saturating_sub(1) {
            self.selected_row += 1;
        }
    }

    fn enter_element_detail(&mut self) {
        // Summary rows have no single element behind them
        if self.selected_element().is_some() {
            self.view = View::ElementDetail;
            self.detail_scroll_offset = 0;
        }
    }

    #[must_use]
    pub fn current_sheet(&self) -> Option<&Sheet> {
        self.sheets.get(self.selected_sheet)
    }

    #[must_use]
    pub fn selected_element(&self) -> Option<&Element> {
        let id = self
            .current_sheet()?
            .rows
            .get(self.selected_row)?
            .element_id
            .as_deref()?;
        self.report.elements.iter().find(|e| e.global_id == id)
    }

    /// Label/value pairs of the selected element; `None` values mark section titles.
    #[must_use]
    pub fn detail_rows(&self) -> Vec<(String, Option<String>)> {
        let Some(element) = self.selected_element() else {
            return Vec::new();
        };
        let e = element.rounded();

        let number = |v: Option<f64>| v.map_or_else(|| NULL_CELL.to_string(), |v| format!("{v}"));
        let mut rows = vec![
            ("Element".to_string(), None),
            ("GlobalId".to_string(), Some(e.global_id.clone())),
            ("Name".to_string(), Some(e.name.clone())),
            ("Category".to_string(), Some(e.category.to_string())),
            ("Position".to_string(), Some(e.position.to_string())),
            ("Type".to_string(), Some(e.type_name.clone())),
            ("Location".to_string(), Some(e.location_key.clone())),
            ("Width (mm)".to_string(), Some(number(e.width_mm))),
            ("Height (mm)".to_string(), Some(number(e.height_mm))),
            ("Thickness (mm)".to_string(), Some(number(e.thickness_mm))),
            ("Area (m²)".to_string(), Some(number(e.area_m2))),
            ("U-Value (W/m²K)".to_string(), Some(number(e.u_value))),
        ];

        if let Some(a) = &e.assembly {
            let text = |v: Option<&str>| v.unwrap_or(NULL_CELL).to_string();
            rows.extend([
                ("Window Assembly".to_string(), None),
                ("Frame Material".to_string(), Some(text(a.frame_material.as_deref()))),
                ("Glass Material".to_string(), Some(text(a.glass_material.as_deref()))),
                ("Frame Width (m)".to_string(), Some(number(a.frame_width))),
                ("Frame Thickness (m)".to_string(), Some(number(Some(a.frame_thickness)))),
                ("Frame k (W/mK)".to_string(), Some(number(Some(a.frame_k)))),
                ("Frame U".to_string(), Some(number(a.frame_u))),
                ("Frame Area (m²)".to_string(), Some(number(a.frame_area))),
                ("Glass k (W/mK)".to_string(), Some(number(a.glass_k))),
                ("Glass U".to_string(), Some(number(Some(a.glass_u)))),
                ("Glass Area (m²)".to_string(), Some(number(a.glass_area))),
            ]);
        }

        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThermalConfig;
    use crate::model::{ElementKind, ElementRecord, PropertySet};
    use crate::thermal::process_batch;
    use pretty_assertions::assert_eq;

    fn app() -> App {
        let mut wall = ElementRecord::new("wall-1", "Wall", ElementKind::Wall);
        wall.property_sets = vec![PropertySet::new("Dimensions")
            .with("Area", 12.0)
            .with("ThermalTransmittance", 0.2)];
        let report = process_batch("model.ifc", vec![Ok(wall)], &ThermalConfig::default());
        App::new(report)
    }

    #[test]
    fn sheets_wrap_around() {
        let mut app = app();
        app.handle_sheet_keys(KeyCode::Left);
        assert_eq!(app.current_sheet().unwrap().file_stem, "skipped");
        app.handle_sheet_keys(KeyCode::Right);
        assert_eq!(app.current_sheet().unwrap().file_stem, "master_summary");
    }

    #[test]
    fn enter_opens_detail_only_for_data_rows() {
        let mut app = app();
        app.handle_sheet_keys(KeyCode::Enter);
        assert_eq!(app.view, View::Sheets);

        while app.current_sheet().unwrap().file_stem != "walls_data" {
            app.handle_sheet_keys(KeyCode::Right);
        }
        app.handle_sheet_keys(KeyCode::Enter);

        assert_eq!(app.view, View::ElementDetail);
        assert!(app
            .detail_rows()
            .contains(&("U-Value (W/m²K)".to_string(), Some("0.2".to_string()))));

        app.handle_detail_keys(KeyCode::Esc);
        assert_eq!(app.view, View::Sheets);
    }

    #[test]
    fn q_quits() {
        let mut app = app();
        app.handle_sheet_keys(KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
