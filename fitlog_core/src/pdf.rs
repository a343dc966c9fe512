//! Minimal PDF serializer for the report layout engine.
//!
//! The layout engine produces pages of positioned text ops; this module
//! turns them into a valid single-font PDF byte stream (header, page
//! tree, Helvetica resource, one content stream per page, xref table).
//! Keeping emission separate from layout keeps the geometry testable
//! without parsing PDF bytes.

/// One piece of text placed at an absolute page position.
///
/// Coordinates follow PDF convention: origin at the bottom-left corner,
/// y increasing upwards, units in points.
#[derive(Clone, Debug)]
pub struct TextOp {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub text: String,
}

/// A page of text ops, emitted as one content stream.
#[derive(Clone, Debug, Default)]
pub struct Page {
    pub ops: Vec<TextOp>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&mut self, x: f64, y: f64, size: f64, text: impl Into<String>) {
        self.ops.push(TextOp {
            x,
            y,
            size,
            text: text.into(),
        });
    }
}

/// US Letter page size in points.
pub const PAGE_WIDTH: f64 = 612.0;
pub const PAGE_HEIGHT: f64 = 792.0;

/// Serialize pages into a complete PDF document.
pub fn write_pdf(pages: &[Page]) -> Vec<u8> {
    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n");

    // Object numbering: 1 catalog, 2 page tree, 3 font, then a
    // page/content-stream pair per page.
    let object_count = 3 + pages.len() * 2;
    let mut offsets = vec![0usize; object_count + 1];

    begin_object(&mut out, &mut offsets, 1);
    out.extend_from_slice(b"<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", 4 + 2 * i))
        .collect();
    begin_object(&mut out, &mut offsets, 2);
    out.extend(
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>\nendobj\n",
            kids.join(" "),
            pages.len()
        )
        .into_bytes(),
    );

    begin_object(&mut out, &mut offsets, 3);
    out.extend_from_slice(b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>\nendobj\n");

    for (i, page) in pages.iter().enumerate() {
        let page_obj = 4 + 2 * i;
        let content_obj = page_obj + 1;

        begin_object(&mut out, &mut offsets, page_obj);
        out.extend(
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>\nendobj\n",
                fmt_num(PAGE_WIDTH),
                fmt_num(PAGE_HEIGHT),
                content_obj
            )
            .into_bytes(),
        );

        let stream = content_stream(page);
        begin_object(&mut out, &mut offsets, content_obj);
        out.extend(format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes());
        out.extend(stream.into_bytes());
        out.extend_from_slice(b"endstream\nendobj\n");
    }

    let xref_offset = out.len();
    out.extend(format!("xref\n0 {}\n", object_count + 1).into_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets.iter().skip(1) {
        out.extend(format!("{:010} 00000 n \n", offset).into_bytes());
    }
    out.extend(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            object_count + 1,
            xref_offset
        )
        .into_bytes(),
    );

    out
}

fn begin_object(out: &mut Vec<u8>, offsets: &mut [usize], number: usize) {
    offsets[number] = out.len();
    out.extend(format!("{} 0 obj\n", number).into_bytes());
}

fn content_stream(page: &Page) -> String {
    let mut stream = String::new();
    for op in &page.ops {
        stream.push_str(&format!(
            "BT /F1 {} Tf {} {} Td ({}) Tj ET\n",
            fmt_num(op.size),
            fmt_num(op.x),
            fmt_num(op.y),
            escape_text(&op.text)
        ));
    }
    stream
}

/// Escape the characters with special meaning inside PDF literal strings.
fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

fn fmt_num(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}
