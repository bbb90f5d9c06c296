use color_print::cformat;

use crate::token::Pos;

/// One emitted statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub address: u16,
    pub bytes: Vec<u8>,
    pub text: String,
    /// Symbol the operand was resolved from
    pub reference: Option<String>,
    pub pos: Pos,
}

#[derive(Debug, Default, Clone)]
pub struct Listing(Vec<Row>);

impl Listing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: Row) {
        self.0.push(row);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn print_dump(&self) {
        let mut file: Option<&str> = None;
        for row in &self.0 {
            if file != Some(row.pos.file.as_str()) {
                let path = &row.pos.file;
                println!(
                    "{}+------[{}]{}",
                    "-".repeat(19),
                    path,
                    "-".repeat(45usize.saturating_sub(path.len()))
                );
                file = Some(path.as_str());
            }

            // Three bytes per line, the rest on continuation lines
            for (idx, chunk) in row.bytes.chunks(3).enumerate() {
                let addr = row.address.wrapping_add(3 * idx as u16);
                let bin = chunk
                    .iter()
                    .map(|b| format!("{:02X}", b))
                    .collect::<Vec<_>>()
                    .join(" ");
                if idx == 0 {
                    println!(
                        "[{:04X}] {:<8}   | {:>4}:   {}",
                        addr,
                        bin,
                        row.pos.line + 1,
                        cformat_row(row)
                    );
                } else {
                    println!("[{:04X}] {:<8}   |", addr, bin);
                }
            }
        }
        println!("-------------------+-----------------------------------------------------");
    }
}

fn cformat_row(row: &Row) -> String {
    let (head, tail) = row.text.split_once(' ').unwrap_or((&row.text, ""));
    let reference = row
        .reference
        .as_ref()
        .map(|name| cformat!(" <g>; {}</>", name))
        .unwrap_or_default();
    if head.starts_with('.') {
        cformat!("<c>{}</> <y>{}</>{}", head, tail, reference)
    } else {
        cformat!("<red>{:<4}</><yellow>{}</>{}", head, tail, reference)
    }
}
