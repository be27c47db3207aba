//! Console summaries printed after each cycle.

/// A line of a summary table.
pub trait ReportRow {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

/// An item announced by additions mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItemRow {
    pub id: u64,
    pub author: String,
    pub name: String,
    pub category: String,
    pub link: String,
}

impl ReportRow for NewItemRow {
    const HEADERS: &'static [&'static str] = &["ID", "Author", "Name", "Category", "Link"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.author.clone(),
            self.name.clone(),
            self.category.clone(),
            self.link.clone(),
        ]
    }
}

/// One skipped-over version of a bumped item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRow {
    pub id: u64,
    pub author: String,
    pub name: String,
    pub category: String,
    pub link: String,
    pub old_version: String,
    pub new_version: String,
}

impl ReportRow for UpdateRow {
    const HEADERS: &'static [&'static str] = &[
        "ID",
        "Author",
        "Name",
        "Category",
        "Link",
        "Old Version",
        "New Version",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.author.clone(),
            self.name.clone(),
            self.category.clone(),
            self.link.clone(),
            self.old_version.clone(),
            self.new_version.clone(),
        ]
    }
}

/// An item that started being tracked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedRow {
    pub id: u64,
    pub author: String,
    pub name: String,
    pub link: String,
}

impl ReportRow for TrackedRow {
    const HEADERS: &'static [&'static str] = &["ID", "Author", "Name", "Link"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.author.clone(),
            self.name.clone(),
            self.link.clone(),
        ]
    }
}

/// Render rows as a boxed, left-aligned table.
pub fn render_table<R: ReportRow>(rows: &[R]) -> String {
    let cells: Vec<Vec<String>> = rows.iter().map(ReportRow::cells).collect();

    let mut widths: Vec<usize> = R::HEADERS.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let border = widths
        .iter()
        .map(|w| "-".repeat(w + 2))
        .collect::<Vec<_>>()
        .join("+");
    let border = format!("+{border}+");

    let line = |row: &[String]| {
        let inner = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| {
                let pad = width - cell.chars().count();
                format!(" {}{} ", cell, " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join("|");
        format!("|{inner}|")
    };

    let headers: Vec<String> = R::HEADERS.iter().map(|h| h.to_string()).collect();
    let mut out = vec![border.clone(), line(&headers), border.clone()];
    out.extend(cells.iter().map(|row| line(row)));
    out.push(border);
    out.join("\n")
}

/// Print a titled table, or `empty` when there is nothing to show.
pub fn print_summary<R: ReportRow>(title: &str, empty: &str, rows: &[R]) {
    if rows.is_empty() {
        println!("{empty}");
    } else {
        println!("{title}");
        println!("{}", render_table(rows));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_table() {
        let rows = vec![TrackedRow {
            id: 7,
            author: "bob".into(),
            name: "Longer Name".into(),
            link: "L".into(),
        }];

        let expected = "\
+----+--------+-------------+------+
| ID | Author | Name        | Link |
+----+--------+-------------+------+
| 7  | bob    | Longer Name | L    |
+----+--------+-------------+------+";
        assert_eq!(render_table(&rows), expected);
    }

    #[test]
    fn test_render_empty_table_has_headers() {
        let rows: Vec<TrackedRow> = vec![];
        assert_eq!(render_table(&rows).lines().count(), 4);
    }
}
