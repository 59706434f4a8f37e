use crate::ui::app::App;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph, Row, Scrollbar, ScrollbarOrientation, ScrollbarState, Table,
    },
    Frame,
};

// Brandbook colors
const BRAND_DARK: Color = Color::Rgb(0x1F, 0x2F, 0x3C); // #1f2f3c
const BRAND_SELECT_BG: Color = Color::Rgb(0xC3, 0xD3, 0xE0); // #c3d3e0
const BRAND_GREEN: Color = Color::Rgb(0x82, 0x9A, 0x68); // #829a68
const BRAND_ORANGE: Color = Color::Rgb(0x9E, 0x68, 0x3C); // #9e683c
const BRAND_MUTED: Color = Color::Rgb(0x71, 0x65, 0x65); // #716565

// Styles
const HEADER_STYLE: Style = Style::new().fg(BRAND_DARK).add_modifier(Modifier::BOLD);
const SELECTED_STYLE: Style = Style::new()
    .bg(BRAND_SELECT_BG)
    .fg(BRAND_DARK)
    .add_modifier(Modifier::BOLD);
const SECTION_STYLE: Style = Style::new().fg(BRAND_ORANGE).add_modifier(Modifier::BOLD);

pub fn draw_report(frame: &mut Frame, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(3), // Header
        Constraint::Length(1), // Sheet tabs
        Constraint::Min(10),   // Sheet table
        Constraint::Length(3), // Footer
    ])
    .split(frame.area());

    draw_header(frame, chunks[0], app);
    draw_tabs(frame, chunks[1], app);
    draw_sheet(frame, chunks[2], app);
    draw_footer(
        frame,
        chunks[3],
        " ←→ Sheet | ↑↓ Row | Enter Element | q Quit ",
    );
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let report = &app.report;
    let title = format!(
        " IFC Thermal | {} | {} elements | {} skipped | {:.1} m² ",
        report.source,
        report.elements.len(),
        report.skipped.len(),
        report.total_area()
    );

    let header = Paragraph::new(title)
        .style(HEADER_STYLE)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

fn draw_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::new();
    for (i, sheet) in app.sheets.iter().enumerate() {
        let style = if i == app.selected_sheet {
            SELECTED_STYLE
        } else {
            Style::default().fg(BRAND_MUTED)
        };
        spans.push(Span::styled(format!(" {} ", sheet.title), style));
        spans.push(Span::styled(
            format!("({}) ", sheet.rows.len()),
            Style::default().fg(BRAND_GREEN),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_sheet(frame: &mut Frame, area: Rect, app: &App) {
    let Some(sheet) = app.current_sheet() else {
        return;
    };

    // Subtract 3 for borders and header
    let visible_rows = (area.height as usize).saturating_sub(3);
    let scroll_offset = if app.selected_row >= visible_rows {
        app.selected_row - visible_rows + 1
    } else {
        0
    };

    let header = Row::new(sheet.headers.clone())
        .style(HEADER_STYLE)
        .height(1);

    let rows: Vec<Row> = sheet
        .rows
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(visible_rows)
        .map(|(i, row)| {
            let style = if i == app.selected_row {
                SELECTED_STYLE
            } else {
                Style::default()
            };
            Row::new(row.cells.clone()).style(style)
        })
        .collect();

    let widths: Vec<Constraint> = sheet
        .headers
        .iter()
        .map(|h| match h.as_str() {
            "Name" | "Type" | "Reason" | "GlobalId" => Constraint::Fill(2),
            _ => Constraint::Fill(1),
        })
        .collect();

    let title = format!(" {} ({} rows) ", sheet.title, sheet.rows.len());
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(BRAND_ORANGE)),
    );

    frame.render_widget(table, area);

    if sheet.rows.len() > visible_rows {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));
        let mut scrollbar_state = ScrollbarState::new(sheet.rows.len()).position(app.selected_row);

        let scrollbar_area = Rect {
            x: area.x + area.width - 1,
            y: area.y + 2,
            width: 1,
            height: area.height.saturating_sub(3),
        };
        frame.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
    }
}

fn draw_footer(frame: &mut Frame, area: Rect, help: &str) {
    let footer = Paragraph::new(help)
        .style(Style::default().fg(BRAND_MUTED))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}

pub fn draw_element_detail(frame: &mut Frame, app: &App) {
    let Some(element) = app.selected_element() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(3), // Header: element name
        Constraint::Min(6),    // Values (scrollable)
        Constraint::Length(3), // Footer
    ])
    .split(frame.area());

    let header = Paragraph::new(format!(
        " {}: {} ({}) ",
        element.category, element.name, element.global_id
    ))
    .style(HEADER_STYLE)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    let all_rows = app.detail_rows();
    let rows: Vec<Row> = all_rows
        .iter()
        .skip(app.detail_scroll_offset)
        .map(|(label, value)| match value {
            Some(value) => Row::new(vec![label.clone(), value.clone()]),
            None => Row::new(vec![label.clone(), String::new()]).style(SECTION_STYLE),
        })
        .collect();

    let widths = [Constraint::Percentage(40), Constraint::Percentage(60)];
    let table = Table::new(rows, widths)
        .header(Row::new(vec!["Property", "Value"]).style(HEADER_STYLE))
        .block(Block::default().title(" Thermal Values ").borders(Borders::ALL));
    frame.render_widget(table, chunks[1]);

    let area = chunks[1];
    let visible_rows = (area.height as usize).saturating_sub(3);
    if all_rows.len() > visible_rows {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));
        let mut scrollbar_state =
            ScrollbarState::new(all_rows.len()).position(app.detail_scroll_offset);
        let scrollbar_area = Rect {
            x: area.x + area.width - 1,
            y: area.y + 2,
            width: 1,
            height: area.height.saturating_sub(3),
        };
        frame.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
    }

    draw_footer(frame, chunks[2], " ↑↓ Scroll | Esc Back | q Quit ");
}
