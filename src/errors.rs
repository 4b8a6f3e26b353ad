use actix_web::{error, http::StatusCode, HttpResponse};
use derive_more::{Display, Error};

/// Error taxonomy of the API. Authorization/not-found decisions inside the
/// services construct these directly; storage faults arrive through the
/// `From<sqlx::Error>` impl at the boundary.
#[derive(Debug, Display, Error)]
pub enum ApiError {
    #[display(fmt = "{}", _0)]
    Validation(#[error(not(source))] String),

    #[display(fmt = "{}", _0)]
    Authentication(#[error(not(source))] String),

    #[display(fmt = "{}", _0)]
    Authorization(#[error(not(source))] String),

    #[display(fmt = "{}", _0)]
    NotFound(#[error(not(source))] String),

    #[display(fmt = "{}", _0)]
    Conflict(#[error(not(source))] String),

    #[display(fmt = "{}", _0)]
    Dependency(#[error(not(source))] String),

    #[display(fmt = "internal server error")]
    Internal,
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn authentication(msg: impl Into<String>) -> Self {
        ApiError::Authentication(msg.into())
    }

    pub fn authorization(msg: impl Into<String>) -> Self {
        ApiError::Authorization(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }

    /// Maps a Postgres fault code to a user-facing error, mirroring the
    /// fixed table in the error-handling middleware this API exposes.
    pub fn from_pg_code(code: &str) -> Self {
        match code {
            // unique_violation
            "23505" => ApiError::Conflict("duplicate entry, this record already exists".into()),
            // foreign_key_violation
            "23503" => {
                ApiError::Validation("invalid reference, related record does not exist".into())
            }
            // not_null_violation
            "23502" => ApiError::Validation("required field is missing".into()),
            // undefined_table
            "42P01" => {
                ApiError::Dependency("database schema is missing, run the migrations".into())
            }
            // invalid_password
            "28P01" => ApiError::Dependency("database authentication failed".into()),
            // invalid_catalog_name
            "3D000" => ApiError::Dependency("database does not exist".into()),
            _ => ApiError::Internal,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        log::error!("storage error: {:?}", err);
        match &err {
            sqlx::Error::RowNotFound => ApiError::NotFound("record not found".into()),
            sqlx::Error::Database(db) => match db.code() {
                Some(code) => ApiError::from_pg_code(&code),
                None => ApiError::Internal,
            },
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                ApiError::Dependency("database connection failed".into())
            }
            sqlx::Error::Configuration(_) => {
                ApiError::Dependency("database is misconfigured".into())
            }
            _ => ApiError::Internal,
        }
    }
}

#[derive(serde::Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
}

impl error::ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            message: &self.to_string(),
        })
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ApiError::Authorization(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Dependency(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::error::ResponseError;

    #[test]
    fn pg_unique_violation_is_conflict() {
        let err = ApiError::from_pg_code("23505");
        assert!(matches!(err, ApiError::Conflict(_)));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn pg_constraint_violations_are_validation() {
        assert!(matches!(
            ApiError::from_pg_code("23503"),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            ApiError::from_pg_code("23502"),
            ApiError::Validation(_)
        ));
    }

    #[test]
    fn pg_environment_faults_are_dependency() {
        for code in ["42P01", "28P01", "3D000"] {
            assert!(matches!(
                ApiError::from_pg_code(code),
                ApiError::Dependency(_)
            ));
        }
    }

    #[test]
    fn unknown_pg_code_is_internal() {
        assert!(matches!(ApiError::from_pg_code("55P03"), ApiError::Internal));
    }

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(
            ApiError::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::authentication("x").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::authorization("x").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Internal.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
