use crate::{
    db::user_repository::{NewUser, UserRepository},
    models::{
        account_verification::AccountVerification,
        reset_password::{ResetPassword, ResetPasswordUpdate},
        user::{UpdateUserPayload, User},
    },
};
use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

const USER_COLUMNS: &str = r#"
    id,
    email,
    username,
    name,
    password_hash,
    is_active,
    is_verified_email,
    refresh_token,
    created_at,
    updated_at
"#;

pub struct PostgresUserRepository {
    pub pool: PgPool,
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create_user(&self, new_user: &NewUser) -> Result<User, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let now = OffsetDateTime::now_utc();

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (
                id,
                email,
                username,
                name,
                password_hash,
                is_active,
                is_verified_email,
                refresh_token,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, false, false, NULL, $6, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new_user.email)
        .bind(&new_user.username)
        .bind(&new_user.name)
        .bind(&new_user.password_hash)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO account_verifications (id, user_id, verification_code, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user.id)
        .bind(&new_user.verification_code)
        .bind(new_user.verification_expires_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO reset_passwords (id, user_id, reset_token, expires_at)
            VALUES ($1, $2, NULL, NULL)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
    }

    async fn update_refresh_token(
        &self,
        user_id: Uuid,
        hash: Option<&str>,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<String>>(
            r#"
            UPDATE users
            SET refresh_token = $1, updated_at = $2
            WHERE id = $3
            RETURNING refresh_token
            "#,
        )
        .bind(hash)
        .bind(OffsetDateTime::now_utc())
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn activate_user(&self, user_id: Uuid) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE users
            SET is_active = true, is_verified_email = true, updated_at = $1
            WHERE id = $2
            "#,
        )
        .bind(OffsetDateTime::now_utc())
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        sqlx::query("DELETE FROM account_verifications WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn update_user_password(
        &self,
        user_id: Uuid,
        password_hash: &str,
    ) -> Result<(), sqlx::Error> {
        let updated =
            sqlx::query("UPDATE users SET password_hash = $1, updated_at = $2 WHERE id = $3")
                .bind(password_hash)
                .bind(OffsetDateTime::now_utc())
                .bind(user_id)
                .execute(&self.pool)
                .await?;

        if updated.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }
        Ok(())
    }

    async fn update_reset_password(
        &self,
        user_id: Uuid,
        update: &ResetPasswordUpdate,
    ) -> Result<(), sqlx::Error> {
        let updated = sqlx::query(
            r#"
            UPDATE reset_passwords
            SET reset_token = $1, expires_at = $2
            WHERE user_id = $3
            "#,
        )
        .bind(update.reset_token.as_deref())
        .bind(update.expires_at)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }
        Ok(())
    }

    async fn complete_password_reset(
        &self,
        token: &str,
        password_hash: &str,
    ) -> Result<Option<Uuid>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let now = OffsetDateTime::now_utc();

        // The row lock taken by this UPDATE makes a concurrent reset with the
        // same token see the cleared row and match nothing.
        let user_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE reset_passwords
            SET reset_token = NULL, expires_at = NULL
            WHERE reset_token = $1 AND expires_at > $2
            RETURNING user_id
            "#,
        )
        .bind(token)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(user_id) = user_id else {
            tx.rollback().await?;
            return Ok(None);
        };

        let updated = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $1, refresh_token = NULL, updated_at = $2
            WHERE id = $3
            "#,
        )
        .bind(password_hash)
        .bind(now)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        tx.commit().await?;
        Ok(Some(user_id))
    }

    async fn update_user_profile(
        &self,
        user_id: Uuid,
        update: &UpdateUserPayload,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET username = COALESCE($1, username),
                name = COALESCE($2, name),
                updated_at = $3
            WHERE id = $4
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(update.username.as_deref())
        .bind(update.name.as_deref())
        .bind(OffsetDateTime::now_utc())
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<(), sqlx::Error> {
        // account_verifications and reset_passwords cascade on the FK
        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }
        Ok(())
    }

    async fn find_account_verification(
        &self,
        user_id: Uuid,
    ) -> Result<Option<AccountVerification>, sqlx::Error> {
        sqlx::query_as::<_, AccountVerification>(
            r#"
            SELECT id, user_id, verification_code, expires_at
            FROM account_verifications
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn find_reset_password_by_token(
        &self,
        token: &str,
    ) -> Result<Option<ResetPassword>, sqlx::Error> {
        sqlx::query_as::<_, ResetPassword>(
            r#"
            SELECT id, user_id, reset_token, expires_at
            FROM reset_passwords
            WHERE reset_token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
    }
}
