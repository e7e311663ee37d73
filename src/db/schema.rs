pub const SCHEMA: &str = r#"
-- content documents (schema-flexible JSON bodies, url denormalized for lookups)
CREATE TABLE IF NOT EXISTS content_documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL,
    body TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_content_documents_url ON content_documents(url);
"#;
