//! SQL schema for the helpdesk SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS tickets (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    title          TEXT NOT NULL,
    description    TEXT NOT NULL,
    status         TEXT NOT NULL DEFAULT 'open'
                   CHECK (status IN ('open', 'in_progress', 'resolved')),
    priority       TEXT NOT NULL DEFAULT 'medium'
                   CHECK (priority IN ('low', 'medium', 'high')),
    customer_name  TEXT NOT NULL,
    customer_email TEXT NOT NULL,
    assigned_to    TEXT,            -- NULL means unassigned
    created_at     TEXT NOT NULL,   -- fixed-width RFC 3339 UTC
    updated_at     TEXT NOT NULL,
    CHECK (updated_at >= created_at)
);

-- Comments are append-only.
CREATE TABLE IF NOT EXISTS ticket_comments (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    ticket_id    INTEGER NOT NULL REFERENCES tickets(id),
    author_name  TEXT NOT NULL,
    author_email TEXT NOT NULL,
    comment      TEXT NOT NULL,
    is_staff     INTEGER NOT NULL DEFAULT 0,
    created_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS tickets_status_idx  ON tickets(status);
CREATE INDEX IF NOT EXISTS tickets_created_idx ON tickets(created_at);
CREATE INDEX IF NOT EXISTS tickets_updated_idx ON tickets(updated_at);
CREATE INDEX IF NOT EXISTS comments_ticket_idx ON ticket_comments(ticket_id, created_at);

PRAGMA user_version = 1;
";
