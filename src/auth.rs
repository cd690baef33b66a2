use crate::db::DbConnection;
use crate::models::{NewUser, User};
use crate::store;
use bcrypt::{hash, verify, DEFAULT_COST};

pub fn hash_password(password: &str) -> String {
    hash(password, DEFAULT_COST).unwrap()
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    verify(password, hash).unwrap_or(false)
}

pub async fn register(conn: &DbConnection, new: &NewUser) -> Result<User, rusqlite::Error> {
    let password_hash = hash_password(&new.password);
    store::insert_user(conn, new, &password_hash).await
}

// Unknown email and wrong password both come back as None; callers cannot
// tell the two apart.
pub async fn login(
    conn: &DbConnection,
    email: &str,
    password: &str,
) -> Result<Option<User>, rusqlite::Error> {
    let user = store::find_user_by_email(conn, email).await?;
    Ok(user.filter(|user| verify_password(password, &user.password_hash)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_round_trip() {
        let hashed = hash_password("pw1");
        assert_ne!(hashed, "pw1");
        assert!(verify_password("pw1", &hashed));
        assert!(!verify_password("wrong", &hashed));
    }

    #[test]
    fn verify_tolerates_garbage_hash() {
        assert!(!verify_password("pw1", "not-a-bcrypt-hash"));
    }
}
