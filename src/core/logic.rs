//! The attendance core as its collaborators see it.
//!
//! `Attendance` owns one SQLite connection and the field cipher, and exposes
//! the full external interface: recording events through the gate, status
//! queries, daily and live summaries, ledger reads, roster CRUD, and the
//! encryption switch. Synchronous, single writer; each call is atomic at the
//! call boundary and nothing here spans two calls with a transaction.

use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::core::gate::Gate;
use crate::core::status;
use crate::core::summary::{self, CloseRule, DayOutcome};
use crate::crypto::cipher::{CipherContext, FieldCipher};
use crate::crypto::passphrase;
use crate::db::pool::DbPool;
use crate::db::{events, identities, initialize, log};
use crate::errors::{AppError, AppResult};
use crate::models::day_summary::DailySummary;
use crate::models::event::Event;
use crate::models::event_kind::EventKind;
use crate::models::identity::{Identity, IdentityMeta};
use crate::models::policy::ClosePolicy;
use crate::models::status::Status;

pub struct Attendance {
    pool: DbPool,
    cipher: FieldCipher,
}

impl Attendance {
    /// Open (and if needed initialize) the store with encryption disabled.
    pub fn open(db_path: &str) -> AppResult<Self> {
        let pool = DbPool::new(db_path)?;
        initialize::init_db(&pool.conn)?;
        Ok(Self {
            pool,
            cipher: FieldCipher::Disabled,
        })
    }

    /// Open with an active field cipher derived from the passphrase.
    pub fn open_with_passphrase(db_path: &str, pass: &str) -> AppResult<Self> {
        let mut att = Self::open(db_path)?;
        att.cipher = FieldCipher::Active(CipherContext::from_passphrase(pass));
        Ok(att)
    }

    pub fn conn(&self) -> &rusqlite::Connection {
        &self.pool.conn
    }

    // ---------------------------
    // Events
    // ---------------------------

    /// Record a checkin/checkout for an identity at the given instant
    /// (defaults to now). Goes through the validation gate.
    pub fn record_event(
        &self,
        identity_id: &str,
        kind: EventKind,
        at: Option<NaiveDateTime>,
    ) -> AppResult<Event> {
        let at = at.unwrap_or_else(|| Local::now().naive_local());
        let ev = Gate::record_event(&self.pool.conn, &self.cipher, identity_id, kind, at, None)?;
        log::ttlog(
            &self.pool.conn,
            "record_event",
            identity_id,
            &format!("{} at {}", kind.to_db_str(), ev.at_str()),
        )?;
        self.open_event(ev)
    }

    /// Record a checkout whose exact time is not known yet. The event is
    /// stored with a pending tag and today's timestamp; `resolve_pending`
    /// fixes the time later.
    pub fn record_pending_checkout(&self, identity_id: &str, tag: &str) -> AppResult<Event> {
        let at = Local::now().naive_local();
        let ev = Gate::record_event(
            &self.pool.conn,
            &self.cipher,
            identity_id,
            EventKind::Checkout,
            at,
            Some(tag),
        )?;
        log::ttlog(&self.pool.conn, "pending_checkout", identity_id, tag)?;
        self.open_event(ev)
    }

    /// The ledger's one narrow update: set the real timestamp of a pending
    /// checkout and clear its tag.
    pub fn resolve_pending(&self, tag: &str, at: NaiveDateTime) -> AppResult<Event> {
        let ev = events::resolve_pending(&self.pool.conn, tag, at)?;
        log::ttlog(&self.pool.conn, "resolve_pending", tag, &ev.at_str())?;
        self.open_event(ev)
    }

    pub fn all_events(&self) -> AppResult<Vec<Event>> {
        self.open_events(events::all_events(&self.pool.conn)?)
    }

    pub fn events_for_range(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<Event>> {
        self.open_events(events::events_for_range(&self.pool.conn, &start, &end)?)
    }

    pub fn events_for_identity(&self, identity_id: &str) -> AppResult<Vec<Event>> {
        self.open_events(events::events_for_identity(&self.pool.conn, identity_id)?)
    }

    pub fn delete_event(&self, id: i64) -> AppResult<()> {
        events::delete_event(&self.pool.conn, id)?;
        log::ttlog(&self.pool.conn, "delete_event", &id.to_string(), "deleted")?;
        Ok(())
    }

    // ---------------------------
    // Status
    // ---------------------------

    pub fn current_status(&self, identity_id: &str) -> AppResult<Status> {
        status::current_status(&self.pool.conn, identity_id)
    }

    pub fn currently_present(&self) -> AppResult<Vec<(Identity, NaiveDateTime)>> {
        let present = status::currently_present(&self.pool.conn)?;
        present
            .into_iter()
            .map(|(i, at)| Ok((self.open_identity(i)?, at)))
            .collect()
    }

    // ---------------------------
    // Summaries
    // ---------------------------

    /// Pure summary: the policy's close instant is reported as an estimate,
    /// nothing is written. Safe to call any number of times.
    pub fn preview_daily_summary(
        &self,
        date: NaiveDate,
        policy: ClosePolicy,
    ) -> AppResult<Vec<DailySummary>> {
        let outcome = self.run_summary(
            date,
            &CloseRule::Policy {
                policy,
                write_back: false,
            },
        )?;
        Ok(outcome.summaries)
    }

    /// Summary under a write-back policy. Synthetic checkouts fabricated by
    /// the policy are appended to the ledger before the result is returned:
    /// the first call for a day performs the writes, a second call observes
    /// already-closed sessions. That asymmetry is the documented contract.
    pub fn daily_summary_with_auto_close(
        &self,
        date: NaiveDate,
        policy: ClosePolicy,
    ) -> AppResult<Vec<DailySummary>> {
        let outcome = self.run_summary(
            date,
            &CloseRule::Policy {
                policy,
                write_back: true,
            },
        )?;

        for ev in &outcome.synthetic {
            let mut sealed = ev.clone();
            let (name, encrypted) = self.cipher.seal(&sealed.display_name)?;
            sealed.display_name = name;
            sealed.display_name_encrypted = encrypted;
            let stored = events::insert_event(&self.pool.conn, &sealed)?;
            log::ttlog(
                &self.pool.conn,
                "auto_close",
                &stored.identity_id,
                &format!("synthetic checkout at {}", stored.at_str()),
            )?;
        }

        Ok(outcome.summaries)
    }

    /// Hours-so-far summary: still-open sessions are virtually closed at
    /// `now` clamped to the target day, nothing is written back.
    pub fn live_summary(&self, date: NaiveDate) -> AppResult<Vec<DailySummary>> {
        let now = Local::now().naive_local();
        let outcome = self.run_summary(date, &CloseRule::LiveAt(now))?;
        Ok(outcome.summaries)
    }

    fn run_summary(&self, date: NaiveDate, rule: &CloseRule) -> AppResult<DayOutcome> {
        let day_events = self.open_events(events::events_for_day(&self.pool.conn, &date)?)?;
        let roster = identities::list_active_identities(&self.pool.conn)?
            .into_iter()
            .map(|i| self.open_identity(i))
            .collect::<AppResult<Vec<_>>>()?;

        Ok(summary::summarize_day(&day_events, &roster, date, rule))
    }

    // ---------------------------
    // Roster
    // ---------------------------

    /// Insert or fully replace a roster entry. Fields omitted from `meta`
    /// reset to defaults; callers resend full state.
    pub fn add_identity(
        &self,
        id: &str,
        display_name: &str,
        email: Option<&str>,
        meta: IdentityMeta,
    ) -> AppResult<Identity> {
        if !Identity::valid_id(id) {
            return Err(AppError::InvalidIdentityId(id.to_string()));
        }

        let mut identity = Identity::new(id, display_name, email, meta);

        let (name, name_enc) = self.cipher.seal(&identity.display_name)?;
        identity.display_name = name;
        identity.display_name_encrypted = name_enc;
        if let Some(email) = identity.email.take() {
            let (sealed, enc) = self.cipher.seal(&email)?;
            identity.email = Some(sealed);
            identity.email_encrypted = enc;
        }

        identities::upsert_identity(&self.pool.conn, &identity)?;
        log::ttlog(&self.pool.conn, "upsert_identity", id, display_name)?;
        self.open_identity(identity)
    }

    /// Same upsert semantics as `add_identity`.
    pub fn update_identity(
        &self,
        id: &str,
        display_name: &str,
        email: Option<&str>,
        meta: IdentityMeta,
    ) -> AppResult<Identity> {
        self.add_identity(id, display_name, email, meta)
    }

    /// Remove from the active roster; history is kept.
    pub fn remove_identity(&self, id: &str) -> AppResult<()> {
        identities::deactivate_identity(&self.pool.conn, id)?;
        log::ttlog(&self.pool.conn, "remove_identity", id, "deactivated")?;
        Ok(())
    }

    pub fn list_identities(&self) -> AppResult<Vec<Identity>> {
        identities::list_identities(&self.pool.conn)?
            .into_iter()
            .map(|i| self.open_identity(i))
            .collect()
    }

    // ---------------------------
    // Encryption switch
    // ---------------------------

    /// Turn field encryption on: rewrite every plaintext PII field to
    /// ciphertext and keep the derived key for this process. Returns the
    /// passphrase digest for the caller to persist for later verification.
    pub fn enable_encryption(&mut self, pass: &str) -> AppResult<String> {
        let ctx = CipherContext::from_passphrase(pass);
        self.rewrite_fields(|plain| ctx.encrypt_field(plain), true)?;
        self.cipher = FieldCipher::Active(ctx);
        log::ttlog(&self.pool.conn, "encryption", "fields", "enabled")?;
        Ok(passphrase::digest(pass))
    }

    /// Turn field encryption off: rewrite ciphertext back to plaintext.
    /// The caller must have verified the passphrase against its stored
    /// digest first.
    pub fn disable_encryption(&mut self, pass: &str) -> AppResult<()> {
        let ctx = CipherContext::from_passphrase(pass);
        self.rewrite_fields(|stored| ctx.decrypt_field(stored), false)?;
        self.cipher = FieldCipher::Disabled;
        log::ttlog(&self.pool.conn, "encryption", "fields", "disabled")?;
        Ok(())
    }

    pub fn verify_passphrase(pass: &str, stored_digest: &str) -> bool {
        passphrase::verify(pass, stored_digest)
    }

    /// Rewrite PII columns whose `*_encrypted` marker differs from the
    /// target state. Mixed rows are fine: already-converted rows are left
    /// alone, which is what makes the enable/disable boundary restartable.
    fn rewrite_fields<F>(&self, transform: F, target_encrypted: bool) -> AppResult<()>
    where
        F: Fn(&str) -> AppResult<String>,
    {
        let conn = &self.pool.conn;
        let marker = if target_encrypted { 0 } else { 1 };

        let rows: Vec<(String, String, Option<String>, bool, bool)> = {
            let mut stmt = conn.prepare(
                "SELECT id, display_name, email, display_name_encrypted, email_encrypted
                 FROM identities
                 WHERE display_name_encrypted = ?1 OR email_encrypted = ?1",
            )?;
            let mapped = stmt.query_map([marker], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, i32>(3)? == 1,
                    row.get::<_, i32>(4)? == 1,
                ))
            })?;
            let mut out = Vec::new();
            for r in mapped {
                out.push(r?);
            }
            out
        };

        for (id, name, email, name_enc, email_enc) in rows {
            let new_name = if name_enc != target_encrypted {
                transform(&name)?
            } else {
                name
            };
            let new_email = match email {
                Some(e) if email_enc != target_encrypted => Some(transform(&e)?),
                other => other,
            };
            conn.execute(
                "UPDATE identities
                 SET display_name = ?1, email = ?2,
                     display_name_encrypted = ?3, email_encrypted = ?3
                 WHERE id = ?4",
                rusqlite::params![
                    new_name,
                    new_email,
                    if target_encrypted { 1 } else { 0 },
                    id
                ],
            )?;
        }

        let ev_rows: Vec<(i64, String)> = {
            let mut stmt = conn.prepare(
                "SELECT id, display_name FROM events WHERE display_name_encrypted = ?1",
            )?;
            let mapped = stmt.query_map([marker], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?;
            let mut out = Vec::new();
            for r in mapped {
                out.push(r?);
            }
            out
        };

        for (id, name) in ev_rows {
            let new_name = transform(&name)?;
            conn.execute(
                "UPDATE events SET display_name = ?1, display_name_encrypted = ?2 WHERE id = ?3",
                rusqlite::params![new_name, if target_encrypted { 1 } else { 0 }, id],
            )?;
        }

        Ok(())
    }

    // ---------------------------
    // Field decryption helpers
    // ---------------------------

    fn open_identity(&self, mut identity: Identity) -> AppResult<Identity> {
        identity.display_name = self
            .cipher
            .open(&identity.display_name, identity.display_name_encrypted)?;
        identity.display_name_encrypted = false;
        if let Some(email) = identity.email.take() {
            identity.email = Some(self.cipher.open(&email, identity.email_encrypted)?);
            identity.email_encrypted = false;
        }
        Ok(identity)
    }

    fn open_event(&self, mut ev: Event) -> AppResult<Event> {
        ev.display_name = self
            .cipher
            .open(&ev.display_name, ev.display_name_encrypted)?;
        ev.display_name_encrypted = false;
        Ok(ev)
    }

    fn open_events(&self, evs: Vec<Event>) -> AppResult<Vec<Event>> {
        evs.into_iter().map(|e| self.open_event(e)).collect()
    }
}
