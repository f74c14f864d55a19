use crate::models::{BalanceResponse, Child, WeekView};
use crate::week::{week_days, week_start};
use chrono::{Duration, NaiveDate};

const DAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

pub fn render_index(
    today: NaiveDate,
    children: &[Child],
    selected: Option<(&Child, &WeekView, &BalanceResponse)>,
) -> String {
    let tabs = children
        .iter()
        .map(|child| {
            let class = match selected {
                Some((current, _, _)) if current.id == child.id => "tab active",
                _ => "tab",
            };
            format!(
                r#"<a class="{class}" href="/?child={}">{}</a>"#,
                child.id,
                escape(&child.name)
            )
        })
        .collect::<String>();

    let body = match selected {
        Some((child, view, balance)) => render_week(today, child, view, balance),
        None => r#"<p class="empty">No children yet. Add one with <code>POST /api/children</code>.</p>"#
            .to_string(),
    };

    INDEX_HTML
        .replace("{{TODAY}}", &today.to_string())
        .replace("{{TABS}}", &tabs)
        .replace("{{BODY}}", &body)
}

fn render_week(today: NaiveDate, child: &Child, view: &WeekView, balance: &BalanceResponse) -> String {
    let nav = |offset: i64, arrow: &str| match view.start_date.checked_add_signed(Duration::days(offset)) {
        Some(week) => format!(r#"<a href="/?child={}&week={week}">{arrow}</a>"#, child.id),
        None => "<span></span>".to_string(),
    };
    let prev = nav(-7, "&larr;");
    let next = nav(7, "&rarr;");
    let toggle_all = if view.start_date < week_start(today) {
        let label = if view.show_all { "Hide inactive" } else { "Show all" };
        format!(
            r#"<a class="toggle-all" href="/?child={}&week={}&show_all={}">{label}</a>"#,
            child.id,
            view.start_date,
            !view.show_all
        )
    } else {
        String::new()
    };

    let header = DAY_LABELS
        .iter()
        .map(|label| format!("<th>{label}</th>"))
        .collect::<String>();

    let rows = view
        .objectives
        .iter()
        .map(|row| {
            let cells = week_days(view.start_date)
                .zip(row.days)
                .map(|(date, done)| {
                    let mark = if done { "&#10003;" } else { "&middot;" };
                    let class = if done { "day done" } else { "day" };
                    format!(
                        r#"<td><form method="post" action="/ui/toggle"><input type="hidden" name="child" value="{}"><input type="hidden" name="objective" value="{}"><input type="hidden" name="date" value="{date}"><button class="{class}" type="submit">{mark}</button></form></td>"#,
                        child.id, row.id
                    )
                })
                .collect::<String>();
            let hide = format!(
                r#"<form method="post" action="/ui/exclude" onsubmit="return confirm('Hide this objective for this week only?')"><input type="hidden" name="child" value="{}"><input type="hidden" name="objective" value="{}"><input type="hidden" name="week" value="{}"><button class="hide" type="submit" title="Hide for this week">&times;</button></form>"#,
                child.id, row.id, view.start_date
            );
            format!(
                r#"<tr><th class="title"><span>{}</span>{hide}</th>{cells}</tr>"#,
                escape(&row.title)
            )
        })
        .collect::<String>();

    let badge = if view.is_perfect_week {
        r#"<span class="badge">Perfect week! x2</span>"#
    } else {
        ""
    };

    format!(
        r#"<nav class="week">
  {prev}
  <div><strong>{start} &ndash; {end}</strong><span class="label">{label}</span>{toggle_all}</div>
  {next}
</nav>
<section class="score"><span>Weekly score: {score}</span>{badge}</section>
<table>
  <thead><tr><th></th>{header}</tr></thead>
  <tbody>{rows}</tbody>
</table>
<section class="balance">Points: <strong>{balance}</strong> <small>(earned {earned}, adjustments {adjustments})</small></section>"#,
        start = view.start_date.format("%b %d"),
        end = view.end_date.format("%b %d"),
        label = view.week,
        score = view.score,
        balance = balance.balance,
        earned = balance.earned,
        adjustments = balance.adjustments,
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Weekly Tracker</title>
  <style>
    :root {
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --done: #2e9d6a;
    }
    body {
      margin: 0;
      font-family: "Trebuchet MS", sans-serif;
      color: var(--ink);
      background: #f8f3e6;
      display: grid;
      place-items: center;
      padding: 24px 12px;
    }
    .app { width: min(760px, 100%); display: grid; gap: 16px; }
    .tabs { display: flex; gap: 8px; flex-wrap: wrap; }
    .tab { padding: 6px 14px; border-radius: 999px; text-decoration: none; color: var(--accent-2); background: #fff; }
    .tab.active { background: var(--accent-2); color: #fff; }
    .week { display: flex; justify-content: space-between; align-items: center; text-align: center; }
    .week a { text-decoration: none; color: var(--accent-2); font-size: 1.4rem; }
    .label, .toggle-all { display: block; font-size: 0.75rem; }
    .score { display: flex; justify-content: space-between; padding: 8px 12px; border-radius: 8px; background: var(--accent-2); color: #fff; font-weight: 600; }
    .badge { background: var(--accent); border-radius: 999px; padding: 2px 10px; }
    table { width: 100%; border-collapse: collapse; background: #fff; }
    th, td { padding: 4px; text-align: center; font-size: 0.8rem; }
    th.title { text-align: left; display: flex; align-items: center; gap: 4px; }
    th.title span { flex-grow: 1; }
    th.title form { margin: 0; }
    .hide { border: none; background: none; opacity: 0.3; cursor: pointer; }
    .hide:hover { opacity: 1; }
    .day { border: 1px solid #ccc; border-radius: 50%; width: 26px; height: 26px; background: #fff; cursor: pointer; }
    .day.done { background: var(--done); color: #fff; border-color: var(--done); }
    .empty { text-align: center; color: #777; }
  </style>
</head>
<body>
  <main class="app">
    <header><h1>Weekly Tracker</h1><small>Today: {{TODAY}}</small></header>
    <div class="tabs">{{TABS}}</div>
    {{BODY}}
  </main>
</body>
</html>
"#;
