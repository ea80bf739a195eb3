use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::ZlibEncoder;
use resvg::tiny_skia::Pixmap;
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::ExportError;
use crate::pipeline::RenderedArtifact;
use crate::radar::RadarChart;
use crate::selection::{Selection, SelectionQuery};

/// A4 portrait in points.
const PAGE_W: f64 = 595.28;
const PAGE_H: f64 = 841.89;
const MM: f64 = 72.0 / 25.4;
const IMAGE_LEFT: f64 = 10.0 * MM;
const IMAGE_WIDTH: f64 = 180.0 * MM;
const IMAGE_TOP: f64 = 30.0 * MM;
const BOTTOM_MARGIN: f64 = 10.0 * MM;
const TITLE_SIZE: f64 = 16.0;
const TITLE_BASELINE: f64 = PAGE_H - 18.0 * MM;

pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            ' ' => '_',
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect();
    if cleaned.is_empty() {
        "player".to_string()
    } else {
        cleaned
    }
}

/// Sanitised player name plus a short hash of the full selection identity, so
/// two players sharing a name in different squads never overwrite each other.
pub fn artifact_key(competition: &str, team: &str, player: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(competition.as_bytes());
    hasher.update([0x1f]);
    hasher.update(team.as_bytes());
    hasher.update([0x1f]);
    hasher.update(player.as_bytes());
    let digest = hasher.finalize();
    let short: String = digest[..4].iter().map(|b| format!("{b:02x}")).collect();
    format!("{}_{short}", sanitize_name(player))
}

pub fn png_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("radar_{key}.png"))
}

pub fn pdf_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("summary_{key}.pdf"))
}

pub fn workbook_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("cohort_{key}.xlsx"))
}

fn ensure_dir(dir: &Path) -> Result<(), ExportError> {
    fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

pub fn write_png(chart: &RadarChart, dir: &Path, key: &str) -> Result<PathBuf, ExportError> {
    ensure_dir(dir)?;
    let path = png_path(dir, key);
    let bytes = chart.image.encode_png().map_err(|err| ExportError::Png {
        path: path.clone(),
        message: err.to_string(),
    })?;
    fs::write(&path, bytes).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), "chart image written");
    Ok(path)
}

/// Dashboard entry point: the PDF is only produced for the chart rendered for
/// exactly this selection.
pub fn export_pdf(
    artifact: Option<&RenderedArtifact>,
    query: &SelectionQuery,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    let artifact = artifact
        .filter(|a| a.query == *query)
        .ok_or(ExportError::NotRendered)?;
    let title = format!("Summary of {}", query.player);
    write_pdf(&artifact.png_path, &title, &pdf_path(dir, &artifact.key))
}

/// One A4 page: a bold title line and the image 10 mm from the left edge,
/// 180 mm wide (shrunk further only if it would run off the page).
pub fn write_pdf(image_path: &Path, title: &str, out_path: &Path) -> Result<PathBuf, ExportError> {
    if !image_path.is_file() {
        return Err(ExportError::MissingImage(image_path.to_path_buf()));
    }
    let image = Pixmap::load_png(image_path).map_err(|err| ExportError::Png {
        path: image_path.to_path_buf(),
        message: err.to_string(),
    })?;
    let (px_w, px_h) = (image.width(), image.height());
    let pixels = deflate(&rgb_bytes(&image)).map_err(|source| ExportError::Io {
        path: out_path.to_path_buf(),
        source,
    })?;

    let max_h = PAGE_H - IMAGE_TOP - BOTTOM_MARGIN;
    let mut draw_w = IMAGE_WIDTH;
    let mut draw_h = draw_w * f64::from(px_h) / f64::from(px_w.max(1));
    if draw_h > max_h {
        draw_w *= max_h / draw_h;
        draw_h = max_h;
    }
    let image_y = PAGE_H - IMAGE_TOP - draw_h;

    let mut content = Vec::new();
    content.extend_from_slice(b"BT\n/F1 ");
    content.extend_from_slice(format!("{TITLE_SIZE:.0} Tf\n{IMAGE_LEFT:.2} {TITLE_BASELINE:.2} Td\n(").as_bytes());
    content.extend_from_slice(&pdf_text(title));
    content.extend_from_slice(b") Tj\nET\n");
    content.extend_from_slice(
        format!("q\n{draw_w:.2} 0 0 {draw_h:.2} {IMAGE_LEFT:.2} {image_y:.2} cm\n/Im1 Do\nQ\n").as_bytes(),
    );

    let mut pdf = PdfWriter::default();
    pdf.object(b"<< /Type /Catalog /Pages 2 0 R >>");
    pdf.object(b"<< /Type /Pages /Kids [3 0 R] /Count 1 >>");
    pdf.object(
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_W} {PAGE_H}] \
             /Resources << /Font << /F1 4 0 R >> /XObject << /Im1 5 0 R >> >> \
             /Contents 6 0 R >>"
        )
        .as_bytes(),
    );
    pdf.object(b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>");
    pdf.stream(
        &format!(
            "/Type /XObject /Subtype /Image /Width {px_w} /Height {px_h} \
             /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /FlateDecode"
        ),
        &pixels,
    );
    pdf.stream("", &content);
    let bytes = pdf.finish();

    if let Some(parent) = out_path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = fs::File::create(out_path).map_err(|source| ExportError::Io {
        path: out_path.to_path_buf(),
        source,
    })?;
    file.write_all(&bytes).map_err(|source| ExportError::Io {
        path: out_path.to_path_buf(),
        source,
    })?;
    info!(path = %out_path.display(), "summary pdf written");
    Ok(out_path.to_path_buf())
}

/// Opaque RGB triples, alpha dropped after un-premultiplying.
fn rgb_bytes(image: &Pixmap) -> Vec<u8> {
    let mut out = Vec::with_capacity(image.pixels().len() * 3);
    for px in image.pixels() {
        let c = px.demultiply();
        out.extend_from_slice(&[c.red(), c.green(), c.blue()]);
    }
    out
}

fn deflate(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Title text as a WinAnsi literal string body.
fn pdf_text(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push(b'\\');
                out.push(ch as u8);
            }
            ' '..='~' => out.push(ch as u8),
            '\u{a0}'..='\u{ff}' => out.push(ch as u32 as u8),
            _ => out.push(b'?'),
        }
    }
    out
}

/// Sequential object writer; object `n` is the `n`th call.
#[derive(Default)]
struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfWriter {
    fn header(&mut self) {
        if self.buf.is_empty() {
            self.buf.extend_from_slice(b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n");
        }
    }

    fn object(&mut self, body: &[u8]) {
        self.header();
        self.offsets.push(self.buf.len());
        let id = self.offsets.len();
        self.buf.extend_from_slice(format!("{id} 0 obj\n").as_bytes());
        self.buf.extend_from_slice(body);
        self.buf.extend_from_slice(b"\nendobj\n");
    }

    fn stream(&mut self, dict: &str, data: &[u8]) {
        let mut body = format!("<< {dict} /Length {} >>\nstream\n", data.len()).into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(b"\nendstream");
        self.object(&body);
    }

    fn finish(mut self) -> Vec<u8> {
        self.header();
        let xref = self.buf.len();
        let count = self.offsets.len() + 1;
        self.buf
            .extend_from_slice(format!("xref\n0 {count}\n0000000000 65535 f \n").as_bytes());
        for offset in &self.offsets {
            self.buf
                .extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        self.buf.extend_from_slice(
            format!("trailer\n<< /Size {count} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n")
                .as_bytes(),
        );
        self.buf
    }
}

enum Cell {
    Text(String),
    Number(f64),
    Blank,
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map(Cell::Number).unwrap_or(Cell::Blank)
    }
}

/// Cohort table plus the axis geometry of the rendered chart.
pub fn write_cohort_workbook(
    selection: &Selection<'_>,
    chart: &RadarChart,
    dir: &Path,
    key: &str,
) -> Result<PathBuf, ExportError> {
    ensure_dir(dir)?;
    let path = workbook_path(dir, key);

    let mut header: Vec<Cell> = ["Competition", "Team", "Player", "Position", "Matches"]
        .into_iter()
        .map(Cell::from)
        .collect();
    header.extend(selection.metrics.iter().map(|m| Cell::from(m.label.as_str())));
    let mut cohort_rows = vec![header];
    for record in &selection.cohort.members {
        let mut row = vec![
            Cell::from(record.competition.as_str()),
            Cell::from(record.team.as_str()),
            Cell::from(record.player.as_str()),
            Cell::from(record.position.as_str()),
            Cell::from(record.matches),
        ];
        row.extend(selection.metrics.iter().map(|m| Cell::from(record.value(&m.id))));
        cohort_rows.push(row);
    }

    let mut axes_rows = vec![
        [
            "Metric",
            "Label",
            "Angle (deg)",
            "Lower",
            "Upper",
            "Focal",
            "Normalised",
        ]
        .into_iter()
        .map(Cell::from)
        .collect::<Vec<_>>(),
    ];
    for sector in &chart.layout.sectors {
        axes_rows.push(vec![
            Cell::from(sector.metric.as_str()),
            Cell::from(sector.label.as_str()),
            Cell::Number(sector.angle.to_degrees()),
            Cell::Number(sector.lower),
            Cell::Number(sector.upper),
            Cell::Number(sector.value),
            Cell::Number(sector.normalized()),
        ]);
    }

    let to_err = |source: XlsxError| ExportError::Workbook {
        path: path.clone(),
        source,
    };
    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Cohort").map_err(to_err)?;
        write_rows(sheet, &cohort_rows).map_err(to_err)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Axes").map_err(to_err)?;
        write_rows(sheet, &axes_rows).map_err(to_err)?;
    }
    workbook.save(&path).map_err(to_err)?;

    info!(
        path = %path.display(),
        rows = cohort_rows.len().saturating_sub(1),
        "cohort workbook written"
    );
    Ok(path)
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<Cell>]) -> Result<(), XlsxError> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            let (r, c) = (row_idx as u32, col_idx as u16);
            match value {
                Cell::Text(text) => {
                    worksheet.write_string(r, c, text)?;
                }
                Cell::Number(number) => {
                    worksheet.write_number(r, c, *number)?;
                }
                Cell::Blank => {}
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_spaces_and_path_separators() {
        assert_eq!(sanitize_name("Kevin De Bruyne"), "Kevin_De_Bruyne");
        assert_eq!(sanitize_name("A/B"), "A-B");
        assert_eq!(sanitize_name("   "), "player");
    }

    #[test]
    fn artifact_key_separates_same_name_in_other_squads() {
        let a = artifact_key("Premier League", "Arsenal", "Ben White");
        let b = artifact_key("Premier League", "Chelsea", "Ben White");
        assert_ne!(a, b);
        assert!(a.starts_with("Ben_White_"));
        assert_eq!(a.len(), "Ben_White_".len() + 8);
        assert_eq!(a, artifact_key("Premier League", "Arsenal", "Ben White"));
    }

    #[test]
    fn pdf_text_escapes_delimiters_and_maps_latin1() {
        assert_eq!(pdf_text("a(b)\\"), b"a\\(b\\)\\\\".to_vec());
        assert_eq!(pdf_text("Müller"), vec![b'M', 0xfc, b'l', b'l', b'e', b'r']);
        assert_eq!(pdf_text("Ł"), b"?".to_vec());
    }

    #[test]
    fn deflated_pixels_inflate_back() {
        use flate2::read::ZlibDecoder;
        use std::io::Read;

        let raw = vec![49u8; 900 * 3 * 40];
        let packed = deflate(&raw).unwrap();
        assert!(packed.len() < raw.len() / 10);
        let mut back = Vec::new();
        ZlibDecoder::new(packed.as_slice()).read_to_end(&mut back).unwrap();
        assert_eq!(back, raw);
    }
}
