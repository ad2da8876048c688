//! HTTP status codes the service answers with.

/// The statuses the recipe API can produce.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    Ok,                  // 200
    BadRequest,          // 400
    NotFound,            // 404
    MethodNotAllowed,    // 405
    InternalServerError, // 500
}

impl From<Status> for u16 {
    fn from(s: Status) -> u16 {
        match s {
            Status::Ok                  => 200,
            Status::BadRequest          => 400,
            Status::NotFound            => 404,
            Status::MethodNotAllowed    => 405,
            Status::InternalServerError => 500,
        }
    }
}

impl From<Status> for http::StatusCode {
    fn from(s: Status) -> Self {
        match s {
            Status::Ok                  => Self::OK,
            Status::BadRequest          => Self::BAD_REQUEST,
            Status::NotFound            => Self::NOT_FOUND,
            Status::MethodNotAllowed    => Self::METHOD_NOT_ALLOWED,
            Status::InternalServerError => Self::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Status::Ok, 200)]
    #[case(Status::BadRequest, 400)]
    #[case(Status::NotFound, 404)]
    #[case(Status::MethodNotAllowed, 405)]
    #[case(Status::InternalServerError, 500)]
    fn numeric_and_http_codes_agree(#[case] status: Status, #[case] code: u16) {
        assert_eq!(u16::from(status), code);
        assert_eq!(http::StatusCode::from(status).as_u16(), code);
    }
}
