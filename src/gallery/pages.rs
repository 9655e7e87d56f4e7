//! Server-rendered HTML for the gallery demo.

use super::store::UploadRecord;

const STYLE: &str = "body{font-family:sans-serif;max-width:960px;margin:2rem auto;padding:0 1rem}\
label{display:block;margin:.75rem 0 .25rem}input,textarea{width:100%;padding:.4rem}\
table{border-collapse:collapse;width:100%}td,th{border:1px solid #ddd;padding:.5rem;vertical-align:top}\
img{max-width:160px;max-height:160px}.error{color:#b00020}";

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{}</title><style>{}</style></head><body>{}</body></html>",
        escape_html(title),
        STYLE,
        body
    )
}

pub fn upload_form() -> String {
    layout(
        "Upload an image",
        "<h1>Upload an image</h1>\
         <form action=\"/upload\" method=\"post\" enctype=\"multipart/form-data\">\
         <label for=\"name\">Name</label><input id=\"name\" name=\"name\" required>\
         <label for=\"email\">Email</label><input id=\"email\" name=\"email\" type=\"email\" required>\
         <label for=\"description\">Description</label><textarea id=\"description\" name=\"description\" rows=\"3\"></textarea>\
         <label for=\"image\">Image (max 5 MB)</label><input id=\"image\" name=\"image\" type=\"file\" accept=\"image/*\" required>\
         <p><button type=\"submit\">Upload</button></p>\
         </form>",
    )
}

pub fn upload_success(record: &UploadRecord) -> String {
    layout(
        "Upload received",
        &format!(
            "<h1>Thanks, {}!</h1><p>Your image was uploaded.</p><p><a href=\"/\">Upload another</a></p>",
            escape_html(&record.name)
        ),
    )
}

pub fn upload_failed(message: &str) -> String {
    layout(
        "Upload failed",
        &format!(
            "<h1>Upload failed</h1><p class=\"error\">{}</p><p><a href=\"/\">Try again</a></p>",
            escape_html(message)
        ),
    )
}

pub fn admin_listing(records: &[UploadRecord]) -> String {
    let rows: String = records
        .iter()
        .map(|r| {
            let src = format!("/uploads/{}", escape_html(&r.file_name));
            format!(
                "<tr><td><a href=\"{src}\"><img src=\"{src}\" alt=\"\"></a></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&r.name),
                escape_html(&r.email),
                escape_html(&r.description),
                r.uploaded_at.format("%Y-%m-%d %H:%M UTC"),
                src = src,
            )
        })
        .collect();

    let table = if records.is_empty() {
        "<p>No uploads yet.</p>".to_string()
    } else {
        format!(
            "<table><thead><tr><th>Image</th><th>Name</th><th>Email</th><th>Description</th><th>Uploaded</th></tr></thead><tbody>{}</tbody></table>",
            rows
        )
    };

    layout(
        "Uploads",
        &format!("<h1>Uploads ({})</h1>{}", records.len(), table),
    )
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<script>alert('x') & \"y\"</script>"),
            "&lt;script&gt;alert(&#39;x&#39;) &amp; &quot;y&quot;&lt;/script&gt;"
        );
    }

    #[test]
    fn test_admin_listing_escapes_user_input() {
        let record = UploadRecord {
            id: "1".into(),
            name: "<b>Mallory</b>".into(),
            email: "m@example.com".into(),
            description: "hi".into(),
            file_name: "abc.png".into(),
            original_name: None,
            size: 1,
            uploaded_at: Utc::now(),
        };
        let html = admin_listing(&[record]);
        assert!(html.contains("&lt;b&gt;Mallory&lt;/b&gt;"));
        assert!(html.contains("/uploads/abc.png"));
        assert!(!html.contains("<b>Mallory"));
    }

    #[test]
    fn test_empty_listing() {
        assert!(admin_listing(&[]).contains("No uploads yet."));
    }
}
