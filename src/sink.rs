//! Table sinks: writers for the assembled diff table

use crate::error::{Result, TablediffError};
use crate::model::{CellStatus, Header, RowStatus};
use crate::output::EmittedRow;
use crate::synthesis::Synthesis;
use indexmap::IndexMap;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::{Path, PathBuf};

/// Rendering hints for sinks capable of rich formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderHints {
    pub colors: bool,
    pub change_details: bool,
}

impl Default for RenderHints {
    fn default() -> Self {
        Self {
            colors: true,
            change_details: false,
        }
    }
}

/// Call order: `begin`, `write_row`*, `write_synthesis`?, `finish`
pub trait TableSink {
    fn begin(&mut self, header: &Header, hints: &RenderHints) -> Result<()>;

    fn write_row(&mut self, row: &EmittedRow) -> Result<()>;

    fn write_synthesis(&mut self, synthesis: &Synthesis) -> Result<()>;

    fn finish(&mut self) -> Result<()>;
}

fn sink_err(e: impl std::fmt::Display) -> TablediffError {
    TablediffError::sink(e.to_string())
}

/// Text of a cell for formats without highlighting.
/// Inside a change pair, `\` and `->` are escaped so the separator stays unique.
fn cell_text(value: &str, previous: Option<&str>) -> String {
    match previous {
        Some(prev) => format!("{} -> {}", escape_change(prev), escape_change(value)),
        None => value.to_string(),
    }
}

fn escape_change(value: &str) -> Cow<'_, str> {
    if value.contains('\\') || value.contains("->") {
        Cow::Owned(value.replace('\\', "\\\\").replace("->", "-\\>"))
    } else {
        Cow::Borrowed(value)
    }
}

/// `STATUS,COUNT` block followed by the row totals
fn write_synthesis_records<X: Write>(writer: &mut csv::Writer<X>, synthesis: &Synthesis) -> Result<()> {
    writer.write_record(["STATUS", "COUNT"]).map_err(sink_err)?;
    for (status, count) in synthesis.rows() {
        writer
            .write_record([status.as_str(), &count.to_string()])
            .map_err(sink_err)?;
    }
    writer
        .write_record(["TABLE1_ROWS", &synthesis.table1_rows.to_string()])
        .map_err(sink_err)?;
    writer
        .write_record(["TABLE2_ROWS", &synthesis.table2_rows.to_string()])
        .map_err(sink_err)?;
    Ok(())
}

/// Delimited text writer
pub struct CsvSink<W: Write> {
    writer: Option<csv::Writer<W>>,
    delimiter: u8,
}

impl<W: Write> CsvSink<W> {
    pub fn new(inner: W, delimiter: u8) -> Self {
        Self {
            writer: Some(Self::wrap(inner, delimiter)),
            delimiter,
        }
    }

    fn wrap(inner: W, delimiter: u8) -> csv::Writer<W> {
        csv::WriterBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_writer(inner)
    }

    pub fn into_inner(mut self) -> Result<W> {
        self.writer
            .take()
            .ok_or_else(|| TablediffError::sink("writer already closed"))?
            .into_inner()
            .map_err(|e| sink_err(e.error()))
    }

    fn writer(&mut self) -> Result<&mut csv::Writer<W>> {
        self.writer
            .as_mut()
            .ok_or_else(|| TablediffError::sink("writer already closed"))
    }
}

impl<W: Write> TableSink for CsvSink<W> {
    fn begin(&mut self, header: &Header, _hints: &RenderHints) -> Result<()> {
        self.writer()?.write_record(header.columns()).map_err(sink_err)
    }

    fn write_row(&mut self, row: &EmittedRow) -> Result<()> {
        self.writer()?
            .write_record(row.cells.iter().map(|c| cell_text(&c.value, c.previous.as_deref())))
            .map_err(sink_err)
    }

    fn write_synthesis(&mut self, synthesis: &Synthesis) -> Result<()> {
        // One blank line separates the summary block from the rows.
        // An empty csv record would be written as `""`, so the line
        // goes straight to the underlying writer.
        let mut inner = self
            .writer
            .take()
            .ok_or_else(|| TablediffError::sink("writer already closed"))?
            .into_inner()
            .map_err(|e| sink_err(e.error()))?;
        inner.write_all(b"\n").map_err(sink_err)?;
        let writer = self.writer.insert(Self::wrap(inner, self.delimiter));
        write_synthesis_records(writer, synthesis)
    }

    fn finish(&mut self) -> Result<()> {
        self.writer()?.flush().map_err(sink_err)
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum JsonCell {
    Value(String),
    Change { old: String, new: String },
}

#[derive(Serialize)]
struct JsonRow {
    status: RowStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    mark: Option<RowStatus>,
    cells: IndexMap<String, JsonCell>,
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    header: &'a [String],
    rows: &'a [JsonRow],
    #[serde(skip_serializing_if = "Option::is_none")]
    synthesis: Option<&'a Synthesis>,
}

/// Single pretty-printed JSON document written on `finish`
pub struct JsonSink<W: Write> {
    writer: W,
    header: Option<Header>,
    rows: Vec<JsonRow>,
    synthesis: Option<Synthesis>,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            header: None,
            rows: Vec::new(),
            synthesis: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TableSink for JsonSink<W> {
    fn begin(&mut self, header: &Header, _hints: &RenderHints) -> Result<()> {
        self.header = Some(header.clone());
        Ok(())
    }

    fn write_row(&mut self, row: &EmittedRow) -> Result<()> {
        let header = self
            .header
            .as_ref()
            .ok_or_else(|| TablediffError::sink("row written before header"))?;
        let cells = header
            .columns()
            .iter()
            .zip(&row.cells)
            .map(|(name, cell)| {
                let value = match &cell.previous {
                    Some(old) => JsonCell::Change {
                        old: old.clone(),
                        new: cell.value.clone(),
                    },
                    None => JsonCell::Value(cell.value.clone()),
                };
                (name.clone(), value)
            })
            .collect();
        self.rows.push(JsonRow {
            status: row.status,
            mark: row.mark,
            cells,
        });
        Ok(())
    }

    fn write_synthesis(&mut self, synthesis: &Synthesis) -> Result<()> {
        self.synthesis = Some(*synthesis);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let header = self.header.as_ref().map(|h| h.columns()).unwrap_or(&[]);
        let document = JsonDocument {
            header,
            rows: &self.rows,
            synthesis: self.synthesis.as_ref(),
        };
        serde_json::to_writer_pretty(&mut self.writer, &document).map_err(sink_err)?;
        self.writer.write_all(b"\n").map_err(sink_err)?;
        self.writer.flush().map_err(sink_err)
    }
}

/// Aligned terminal table with colored statuses
pub struct PrettySink<W: Write> {
    writer: W,
    hints: RenderHints,
    colors_allowed: bool,
    header: Vec<String>,
    rows: Vec<EmittedRow>,
    synthesis: Option<Synthesis>,
}

impl<W: Write> PrettySink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            hints: RenderHints::default(),
            colors_allowed: true,
            header: Vec::new(),
            rows: Vec::new(),
            synthesis: None,
        }
    }

    /// Never emit ANSI escapes, whatever the render hints ask for
    pub fn without_colors(mut self) -> Self {
        self.colors_allowed = false;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn glyph(mark: Option<RowStatus>) -> &'static str {
        match mark {
            Some(RowStatus::Added) => "+",
            Some(RowStatus::Removed) => "-",
            Some(RowStatus::Changed) => "~",
            _ => " ",
        }
    }

    fn paint(&self, text: &str, mark: Option<RowStatus>, cell: CellStatus) -> String {
        if !self.hints.colors {
            return text.to_string();
        }
        match mark {
            Some(RowStatus::Added) => text.green().to_string(),
            Some(RowStatus::Removed) => text.red().to_string(),
            Some(RowStatus::Changed) if cell == CellStatus::Different || !self.hints.change_details => {
                text.yellow().to_string()
            }
            _ => text.to_string(),
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let texts: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|r| {
                r.cells
                    .iter()
                    .map(|c| match &c.previous {
                        Some(prev) => format!("{} → {}", prev, c.value),
                        None => c.value.clone(),
                    })
                    .collect()
            })
            .collect();

        let mut widths: Vec<usize> = self.header.iter().map(|h| h.chars().count()).collect();
        for row in &texts {
            for (i, text) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(text.chars().count());
                }
            }
        }

        let header_line: Vec<String> = self
            .header
            .iter()
            .zip(&widths)
            .map(|(h, w)| format!("{:<width$}", h, width = w))
            .collect();
        let header_line = header_line.join(" │ ");
        if self.hints.colors {
            writeln!(self.writer, "  {}", header_line.bold())?;
        } else {
            writeln!(self.writer, "  {}", header_line)?;
        }
        let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
        writeln!(self.writer, "  {}", rule.join("─┼─"))?;

        for (row, row_texts) in self.rows.iter().zip(&texts) {
            let cells: Vec<String> = row_texts
                .iter()
                .zip(&row.cells)
                .zip(&widths)
                .map(|((text, cell), w)| {
                    let padded = format!("{:<width$}", text, width = w);
                    self.paint(&padded, row.mark, cell.status)
                })
                .collect();
            writeln!(self.writer, "{} {}", Self::glyph(row.mark), cells.join(" │ "))?;
        }

        if let Some(s) = &self.synthesis {
            writeln!(self.writer)?;
            writeln!(self.writer, "📊 Synthesis")?;
            writeln!(self.writer, "├─ Unchanged: {}", s.unchanged)?;
            writeln!(self.writer, "├─ Changed: {}", s.changed)?;
            writeln!(self.writer, "├─ Added: {}", s.added)?;
            writeln!(self.writer, "├─ Removed: {}", s.removed)?;
            writeln!(self.writer, "└─ Rows read: {} / {}", s.table1_rows, s.table2_rows)?;
        }
        self.writer.flush()
    }
}

impl<W: Write> TableSink for PrettySink<W> {
    fn begin(&mut self, header: &Header, hints: &RenderHints) -> Result<()> {
        self.header = header.columns().to_vec();
        self.hints = RenderHints {
            colors: hints.colors && self.colors_allowed,
            ..*hints
        };
        Ok(())
    }

    fn write_row(&mut self, row: &EmittedRow) -> Result<()> {
        self.rows.push(row.clone());
        Ok(())
    }

    fn write_synthesis(&mut self, synthesis: &Synthesis) -> Result<()> {
        self.synthesis = Some(*synthesis);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.render().map_err(sink_err)
    }
}

/// Keeps everything it is handed; used by library callers and tests
#[derive(Debug, Default)]
pub struct MemorySink {
    pub header: Option<Header>,
    pub hints: Option<RenderHints>,
    pub rows: Vec<EmittedRow>,
    pub synthesis: Option<Synthesis>,
    pub finished: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell values of every written row
    pub fn values(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|r| r.cells.iter().map(|c| c.value.clone()).collect())
            .collect()
    }
}

impl TableSink for MemorySink {
    fn begin(&mut self, header: &Header, hints: &RenderHints) -> Result<()> {
        self.header = Some(header.clone());
        self.hints = Some(*hints);
        Ok(())
    }

    fn write_row(&mut self, row: &EmittedRow) -> Result<()> {
        self.rows.push(row.clone());
        Ok(())
    }

    fn write_synthesis(&mut self, synthesis: &Synthesis) -> Result<()> {
        self.synthesis = Some(*synthesis);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}

/// Sends the synthesis to a separate delimited file; everything else goes to `inner`
pub struct SynthesisFileSink {
    inner: Box<dyn TableSink>,
    path: PathBuf,
    delimiter: u8,
}

impl SynthesisFileSink {
    pub fn new(inner: Box<dyn TableSink>, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let delimiter = match SinkFormat::from_path(&path) {
            Some(SinkFormat::Csv(d)) => d,
            _ => b',',
        };
        Self {
            inner,
            path,
            delimiter,
        }
    }
}

impl TableSink for SynthesisFileSink {
    fn begin(&mut self, header: &Header, hints: &RenderHints) -> Result<()> {
        self.inner.begin(header, hints)
    }

    fn write_row(&mut self, row: &EmittedRow) -> Result<()> {
        self.inner.write_row(row)
    }

    fn write_synthesis(&mut self, synthesis: &Synthesis) -> Result<()> {
        let file = File::create(&self.path).map_err(sink_err)?;
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(BufWriter::new(file));
        write_synthesis_records(&mut writer, synthesis)?;
        writer.flush().map_err(sink_err)?;
        log::info!("Synthesis written to {}", self.path.display());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.inner.finish()
    }
}

/// Output formats the CLI can write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkFormat {
    Pretty,
    Csv(u8),
    Json,
}

impl SinkFormat {
    pub fn parse(s: &str) -> std::result::Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "csv" => Ok(Self::Csv(b',')),
            "tsv" => Ok(Self::Csv(b'\t')),
            "json" => Ok(Self::Json),
            _ => Err(format!(
                "Invalid output format: {}. Use 'pretty', 'csv', 'tsv' or 'json'",
                s
            )),
        }
    }

    /// Format implied by an output path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv(b',')),
            "tsv" | "tab" => Some(Self::Csv(b'\t')),
            "json" => Some(Self::Json),
            "txt" => Some(Self::Pretty),
            _ => None,
        }
    }
}

/// Build a sink writing to `output`, or stdout when no path is given.
/// With `synthesis_path`, the summary goes to that file for every format.
pub fn create_sink(
    format: SinkFormat,
    output: Option<&Path>,
    synthesis_path: Option<&Path>,
) -> Result<Box<dyn TableSink>> {
    let (writer, terminal): (Box<dyn Write>, bool) = match output {
        Some(path) => (
            Box::new(BufWriter::new(File::create(path).map_err(sink_err)?)),
            false,
        ),
        None => (Box::new(io::stdout()), io::stdout().is_terminal()),
    };
    let sink: Box<dyn TableSink> = match format {
        SinkFormat::Pretty if terminal => Box::new(PrettySink::new(writer)),
        SinkFormat::Pretty => Box::new(PrettySink::new(writer).without_colors()),
        SinkFormat::Json => Box::new(JsonSink::new(writer)),
        SinkFormat::Csv(delimiter) => Box::new(CsvSink::new(writer, delimiter)),
    };
    Ok(match synthesis_path {
        Some(path) => Box::new(SynthesisFileSink::new(sink, path)),
        None => sink,
    })
}
