use crate::app::App;
use crate::theme::{badge_icon, category_icon, floor_theme, Theme};
use floorops_core::reconcile::{DashboardModel, Occupancy, TableCard, TableRow, TrafficSeries};
use floorops_core::ViewId;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{BarChart, Block, Borders, Cell, Gauge, Paragraph, Row, Table, Tabs},
    Frame,
};

/// Below this width the navigation bar moves to the bottom.
pub const COMPACT_WIDTH: u16 = 66;
const CARD_WIDTH: u16 = 24;
const CARD_HEIGHT: u16 = 5;
const HOUR_LABELS: [&str; 7] = ["0", "1", "2", "3", "4", "5", "6"];

pub fn is_compact(width: u16) -> bool {
    width < COMPACT_WIDTH
}

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.size();
    let theme = floor_theme();
    frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), area);

    let compact = is_compact(area.width);
    let constraints = if compact {
        [
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ]
    } else {
        [
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ]
    };
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);
    let (nav_area, body_area) = if compact {
        (layout[2], layout[1])
    } else {
        (layout[1], layout[2])
    };

    render_header(frame, app, theme, layout[0]);
    render_nav(frame, app, theme, nav_area);
    match app.view() {
        ViewId::Dashboard => render_dashboard(frame, app, theme, body_area),
        ViewId::Monitor => render_monitor(frame, app, theme, body_area),
        ViewId::Logs => render_logs(frame, app, theme, body_area),
    }
}

fn panel(title: &str, theme: Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .style(Style::default().bg(theme.surface))
        .title(Span::styled(title.to_string(), theme.title_style()))
}

fn render_header(frame: &mut Frame, app: &App, theme: Theme, area: Rect) {
    let connection = app.connection();
    let badge = format!(
        " {} {} ",
        badge_icon(connection),
        connection.badge_label()
    );
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(badge.chars().count() as u16 + 2),
        ])
        .split(area);

    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            "SmartOps",
            Style::default()
                .fg(theme.text)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            app.clock().to_string(),
            Style::default()
                .fg(theme.muted)
                .add_modifier(Modifier::ITALIC),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(theme.border))
            .style(Style::default().bg(theme.bg)),
    );
    frame.render_widget(title, columns[0]);

    let badge = Paragraph::new(Line::from(Span::styled(badge, theme.badge_style(connection))))
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(theme.border))
                .style(Style::default().bg(theme.bg)),
        );
    frame.render_widget(badge, columns[1]);
}

fn render_nav(frame: &mut Frame, app: &App, theme: Theme, area: Rect) {
    let titles: Vec<Line> = ViewId::ALL
        .iter()
        .map(|view| Line::from(format!("{} {}", view.index() + 1, view.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.view().index())
        .style(Style::default().fg(theme.muted))
        .highlight_style(
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        )
        .divider(Span::styled(" | ", Style::default().fg(theme.border)))
        .block(panel("Views", theme));
    frame.render_widget(tabs, area);
}

fn render_dashboard(frame: &mut Frame, app: &App, theme: Theme, area: Rect) {
    let model = &app.models().dashboard;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(10),
            Constraint::Min(0),
        ])
        .split(area);

    render_kpis(frame, model, theme, rows[0]);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[1]);
    render_traffic(frame, &model.traffic, theme, charts[0]);
    render_occupancy(frame, model.occupancy, theme, charts[1]);

    let live = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[2]);
    render_card_list(frame, &model.floor_grid, app, theme, live[0]);
    render_table(
        frame,
        &model.status_table,
        app,
        theme,
        live[1],
        "Live Table Status",
    );
}

fn render_kpis(frame: &mut Frame, model: &DashboardModel, theme: Theme, area: Rect) {
    let kpis = [
        ("Total Calls", &model.kpis.total_calls, theme.primary),
        ("Active Needs", &model.kpis.active_needs, theme.critical),
        ("Avg Response", &model.kpis.avg_response, theme.warn),
        ("Avg Delivery", &model.kpis.avg_delivery, theme.ok),
    ];
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);
    for ((title, value, color), cell) in kpis.into_iter().zip(cells.iter()) {
        let card = Paragraph::new(Line::from(Span::styled(
            value.clone(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .block(panel(title, theme));
        frame.render_widget(card, *cell);
    }
}

fn render_traffic(frame: &mut Frame, traffic: &TrafficSeries, theme: Theme, area: Rect) {
    let data: Vec<(&str, u64)> = HOUR_LABELS
        .iter()
        .zip(traffic.points.iter())
        .map(|(label, &value)| (*label, value.max(0.0).round() as u64))
        .collect();
    let inner_width = area.width.saturating_sub(2);
    let bar_width = (inner_width / HOUR_LABELS.len() as u16)
        .saturating_sub(1)
        .max(1);
    let chart = BarChart::default()
        .block(panel("Hourly Traffic", theme))
        .data(data.as_slice())
        .max(traffic.y_max.round() as u64)
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(Style::default().fg(theme.primary))
        .value_style(Style::default().fg(theme.text).bg(theme.primary))
        .label_style(Style::default().fg(theme.muted));
    frame.render_widget(chart, area);
}

fn render_occupancy(frame: &mut Frame, occupancy: Occupancy, theme: Theme, area: Rect) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);
    let gauge = Gauge::default()
        .block(panel("Floor Availability", theme))
        .gauge_style(Style::default().fg(theme.ok).bg(theme.critical))
        .ratio(occupancy.open_ratio().clamp(0.0, 1.0))
        .label(format!("{} / {}", occupancy.open, occupancy.closed));
    frame.render_widget(gauge, parts[0]);

    let legend = Paragraph::new(Text::from(vec![
        Line::from(vec![
            Span::styled("● ", Style::default().fg(theme.ok)),
            Span::styled(
                format!("Available {}", occupancy.open),
                Style::default().fg(theme.muted),
            ),
        ]),
        Line::from(vec![
            Span::styled("● ", Style::default().fg(theme.critical)),
            Span::styled(
                format!("Occupied {}", occupancy.closed),
                Style::default().fg(theme.muted),
            ),
        ]),
    ]))
    .block(
        Block::default()
            .borders(Borders::LEFT | Borders::RIGHT | Borders::BOTTOM)
            .border_style(Style::default().fg(theme.border))
            .style(Style::default().bg(theme.surface)),
    );
    frame.render_widget(legend, parts[1]);
}

fn empty_note(app: &App) -> &'static str {
    if app.has_data() {
        "No tables reported."
    } else {
        "Waiting for floor data..."
    }
}

fn render_card_list(frame: &mut Frame, cards: &[TableCard], app: &App, theme: Theme, area: Rect) {
    let lines: Vec<Line> = if cards.is_empty() {
        vec![Line::from(Span::styled(
            empty_note(app),
            Style::default().fg(theme.muted),
        ))]
    } else {
        cards
            .iter()
            .skip(usize::from(app.scroll()))
            .map(|card| {
                let color = theme.category_color(card.category);
                Line::from(vec![
                    Span::styled(
                        format!("{} ", category_icon(card.category)),
                        Style::default().fg(color),
                    ),
                    Span::styled(
                        format!("{:<6}", card.table),
                        Style::default()
                            .fg(theme.text)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(format!(" {:<18}", card.status), Style::default().fg(color)),
                    Span::styled(card.minutes_ago.clone(), Style::default().fg(theme.muted)),
                ])
            })
            .collect()
    };
    frame.render_widget(
        Paragraph::new(Text::from(lines)).block(panel("Live Floor Status", theme)),
        area,
    );
}

fn render_table(
    frame: &mut Frame,
    rows: &[TableRow],
    app: &App,
    theme: Theme,
    area: Rect,
    title: &str,
) {
    if rows.is_empty() {
        let note = Paragraph::new(Line::from(Span::styled(
            empty_note(app),
            Style::default().fg(theme.muted),
        )))
        .block(panel(title, theme));
        frame.render_widget(note, area);
        return;
    }

    let header = Row::new(["ID", "STATUS", "AVAIL", "ORDERS"].map(|label| {
        Cell::from(Span::styled(
            label,
            Style::default()
                .fg(theme.title)
                .add_modifier(Modifier::BOLD),
        ))
    }));
    let body: Vec<Row> = rows
        .iter()
        .skip(usize::from(app.scroll()))
        .map(|row| {
            let color = theme.category_color(row.category);
            let orders_color = if row.orders_highlight {
                theme.primary
            } else {
                theme.muted
            };
            Row::new(vec![
                Cell::from(Span::styled(
                    row.table.clone(),
                    Style::default()
                        .fg(theme.text)
                        .add_modifier(Modifier::BOLD),
                )),
                Cell::from(Span::styled(
                    format!("{} {}", category_icon(row.category), row.status),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )),
                Cell::from(Span::styled(
                    row.availability.clone(),
                    Style::default().fg(theme.text),
                )),
                Cell::from(Span::styled(
                    row.orders.clone(),
                    Style::default().fg(orders_color),
                )),
            ])
        })
        .collect();
    let table = Table::new(
        body,
        [
            Constraint::Length(8),
            Constraint::Min(18),
            Constraint::Length(6),
            Constraint::Length(7),
        ],
    )
    .header(header)
    .column_spacing(2)
    .block(panel(title, theme));
    frame.render_widget(table, area);
}

fn render_monitor(frame: &mut Frame, app: &App, theme: Theme, area: Rect) {
    let outer = panel("Live Floor Status", theme);
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let cards = &app.models().monitor.grid;
    if cards.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                empty_note(app),
                Style::default().fg(theme.muted),
            )),
            inner,
        );
        return;
    }

    let columns = (inner.width / CARD_WIDTH).max(1);
    let card_width = inner.width / columns;
    let skip = usize::from(app.scroll()) * usize::from(columns);
    for (slot, card) in cards.iter().skip(skip).enumerate() {
        let slot = slot as u16;
        let x = inner.x + (slot % columns) * card_width;
        let y = inner.y + (slot / columns) * CARD_HEIGHT;
        if y + CARD_HEIGHT > inner.y + inner.height {
            break;
        }
        let rect = Rect::new(x, y, card_width, CARD_HEIGHT);
        frame.render_widget(table_card(card, theme), rect);
    }
}

fn table_card(card: &TableCard, theme: Theme) -> Paragraph<'static> {
    let color = theme.category_color(card.category);
    Paragraph::new(Text::from(vec![
        Line::from(Span::styled(
            format!("{} {}", category_icon(card.category), card.status),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            card.minutes_ago.clone(),
            Style::default().fg(theme.muted),
        )),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(theme.surface))
            .title(Span::styled(
                card.table.clone(),
                Style::default()
                    .fg(theme.text)
                    .add_modifier(Modifier::BOLD),
            )),
    )
}

fn render_logs(frame: &mut Frame, app: &App, theme: Theme, area: Rect) {
    render_table(frame, &app.models().logs.rows, app, theme, area, "Master Log");
}
