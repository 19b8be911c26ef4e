use shared::{BabyInfo, LoginRequest, RegisterRequest, SessionResponse};

use super::parse_date;
use crate::domain::commands::{AuthenticatedAccount, LoginCommand, RegisterCommand};
use crate::domain::models::Baby;
use crate::domain::DomainResult;

pub struct AuthMapper;

impl AuthMapper {
    pub fn to_register_command(request: RegisterRequest) -> DomainResult<RegisterCommand> {
        Ok(RegisterCommand {
            username: request.username,
            password: request.password,
            baby_name: request.baby_name,
            date_of_birth: parse_date(&request.date_of_birth)?,
            invitation_code: request.invitation_code,
        })
    }

    pub fn to_login_command(request: LoginRequest) -> LoginCommand {
        LoginCommand {
            username: request.username,
            password: request.password,
        }
    }

    pub fn to_baby_dto(baby: Baby) -> BabyInfo {
        BabyInfo {
            id: baby.id,
            name: baby.name,
            date_of_birth: shared::day_key(baby.date_of_birth),
        }
    }

    pub fn to_session_dto(authenticated: AuthenticatedAccount) -> SessionResponse {
        SessionResponse {
            authenticated: true,
            username: Some(authenticated.account.username),
            baby: Some(Self::to_baby_dto(authenticated.baby)),
        }
    }
}
