use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{migrate::MigrateDatabase, query, query_as, FromRow, Pool, Sqlite, SqlitePool};

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct WordRecord {
    pub id: i64,
    pub word: String,
    pub pronunciation: Option<String>,
    pub part_of_speech: String,
    pub definition: String,
    pub image_url: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A validated record that is ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWord {
    pub word: String,
    pub pronunciation: Option<String>,
    pub part_of_speech: String,
    pub definition: String,
    pub image_url: String,
}

/// Validated partial update, `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordChanges {
    pub pronunciation: Option<String>,
    pub part_of_speech: Option<String>,
    pub definition: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn initialize(db_url: &str) -> sqlx::Result<Self> {
        if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
            Sqlite::create_database(db_url).await?;
        }
        let pool = SqlitePool::connect(db_url).await?;
        sqlx::migrate!().run(&pool).await?;
        Ok(Self { pool })
    }

    #[cfg(test)]
    /// Fresh in-memory database. A single connection that never expires, every
    /// new connection would otherwise see its own empty database.
    pub async fn in_memory() -> sqlx::Result<Self> {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        sqlx::migrate!().run(&pool).await?;
        Ok(Self { pool })
    }
}

impl Storage {
    pub async fn get_word(&self, word: &str) -> sqlx::Result<Option<WordRecord>> {
        query_as("SELECT * FROM words WHERE word = ?")
            .bind(word)
            .fetch_optional(&self.pool)
            .await
    }

    /// Inserts a word and returns its id.
    pub async fn add_word(&self, word: &NewWord) -> sqlx::Result<i64> {
        let result = query(
            "INSERT INTO words(word, pronunciation, part_of_speech, definition, image_url) VALUES(?, ?, ?, ?, ?)",
        )
        .bind(&word.word)
        .bind(&word.pronunciation)
        .bind(&word.part_of_speech)
        .bind(&word.definition)
        .bind(&word.image_url)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Applies the given changes, returns true if the word exists
    pub async fn update_word(&self, word: &str, changes: &WordChanges) -> sqlx::Result<bool> {
        let result = query(
            "
            UPDATE words SET
                pronunciation = COALESCE(?, pronunciation),
                part_of_speech = COALESCE(?, part_of_speech),
                definition = COALESCE(?, definition),
                image_url = COALESCE(?, image_url),
                updated_at = CURRENT_TIMESTAMP
            WHERE word = ?
            ",
        )
        .bind(&changes.pronunciation)
        .bind(&changes.part_of_speech)
        .bind(&changes.definition)
        .bind(&changes.image_url)
        .bind(word)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Attempt to remove a word, returns true if the word was removed
    pub async fn remove_word(&self, word: &str) -> sqlx::Result<bool> {
        let result = query("DELETE FROM words WHERE word = ?").bind(word).execute(&self.pool);
        let modified_count = result.await?;
        Ok(modified_count.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ephemeral() -> NewWord {
        NewWord {
            word: "ephemeral".to_owned(),
            pronunciation: Some("eh-FEM-er-uhl".to_owned()),
            part_of_speech: "adjective".to_owned(),
            definition: "lasting a short time".to_owned(),
            image_url: "https://img/1.jpg".to_owned(),
        }
    }

    #[tokio::test]
    async fn add_then_get() {
        let storage = Storage::in_memory().await.unwrap();
        let id = storage.add_word(&ephemeral()).await.unwrap();

        let record = storage.get_word("ephemeral").await.unwrap().unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.pronunciation.as_deref(), Some("eh-FEM-er-uhl"));
        assert_eq!(record.definition, "lasting a short time");
        assert!(storage.get_word("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn lookup_ignores_case() {
        let storage = Storage::in_memory().await.unwrap();
        storage.add_word(&ephemeral()).await.unwrap();

        assert!(storage.get_word("Ephemeral").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn word_is_unique() {
        let storage = Storage::in_memory().await.unwrap();
        storage.add_word(&ephemeral()).await.unwrap();

        let error = storage.add_word(&ephemeral()).await.unwrap_err();
        let is_unique = error
            .as_database_error()
            .map(|error| error.is_unique_violation())
            .unwrap_or(false);
        assert!(is_unique);
    }

    #[tokio::test]
    async fn update_only_touches_given_columns() {
        let storage = Storage::in_memory().await.unwrap();
        storage.add_word(&ephemeral()).await.unwrap();

        let changes = WordChanges {
            definition: Some("fleeting".to_owned()),
            ..Default::default()
        };
        assert!(storage.update_word("ephemeral", &changes).await.unwrap());
        assert!(!storage.update_word("missing", &changes).await.unwrap());

        let record = storage.get_word("ephemeral").await.unwrap().unwrap();
        assert_eq!(record.definition, "fleeting");
        assert_eq!(record.part_of_speech, "adjective");
        assert_eq!(record.image_url, "https://img/1.jpg");
    }

    #[tokio::test]
    async fn remove_reports_whether_a_row_went_away() {
        let storage = Storage::in_memory().await.unwrap();
        storage.add_word(&ephemeral()).await.unwrap();

        assert!(storage.remove_word("ephemeral").await.unwrap());
        assert!(!storage.remove_word("ephemeral").await.unwrap());
        assert!(storage.get_word("ephemeral").await.unwrap().is_none());
    }
}
