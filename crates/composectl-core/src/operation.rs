//! The operation catalog
//!
//! Every command the CLI exposes is one [`Operation`]. Building the request
//! for an operation is a pure function of its parameters and cannot fail;
//! anything that can go wrong happens on the wire.

use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;

/// HTTP methods used by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Patch => write!(f, "PATCH"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// Parse HTTP method case-insensitively
impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "get" => Ok(Method::Get),
            "post" => Ok(Method::Post),
            "put" => Ok(Method::Put),
            "patch" => Ok(Method::Patch),
            "delete" => Ok(Method::Delete),
            _ => Err(format!(
                "invalid HTTP method: {} (valid: get, post, put, patch, delete)",
                s
            )),
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Request descriptor: what to send, relative to the API base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path starting with `/`, path parameters already encoded
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// One API operation with its bound parameters
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Accounts the caller belongs to
    ListAccounts,
    ListUsers {
        account_id: String,
    },
    CreateUser {
        account_id: String,
        name: String,
        email: String,
        phone: Option<String>,
    },
    DeleteUser {
        account_id: String,
        user_id: String,
    },
    ListTeams,
    CreateTeam {
        name: String,
    },
    RenameTeam {
        team_id: String,
        name: String,
    },
    DeleteTeam {
        team_id: String,
    },
    AddTeamUsers {
        team_id: String,
        user_ids: Vec<String>,
    },
    ListDeployments,
    ListUserRoles {
        deployment_id: String,
    },
    AssignUserRole {
        deployment_id: String,
        user_id: String,
        role: String,
    },
    RemoveUserRole {
        deployment_id: String,
        user_id: String,
        role: String,
    },
    ListTeamRoles {
        deployment_id: String,
    },
    AssignTeamRole {
        deployment_id: String,
        team_id: String,
        role: String,
    },
    RemoveTeamRole {
        deployment_id: String,
        team_id: String,
        role: String,
    },
}

/// Encode an opaque id as a single path segment
fn seg(id: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(id)
}

impl Operation {
    /// CLI command name for this operation
    pub fn command_name(&self) -> &'static str {
        match self {
            Operation::ListAccounts => "accounts",
            Operation::ListUsers { .. } => "users",
            Operation::CreateUser { .. } => "add-user",
            Operation::DeleteUser { .. } => "remove-user",
            Operation::ListTeams => "teams",
            Operation::CreateTeam { .. } => "add-team",
            Operation::RenameTeam { .. } => "update-team",
            Operation::DeleteTeam { .. } => "remove-team",
            Operation::AddTeamUsers { .. } => "add-team-users",
            Operation::ListDeployments => "deployments",
            Operation::ListUserRoles { .. } => "user-roles",
            Operation::AssignUserRole { .. } => "assign-user-role",
            Operation::RemoveUserRole { .. } => "remove-user-role",
            Operation::ListTeamRoles { .. } => "team-roles",
            Operation::AssignTeamRole { .. } => "assign-team-role",
            Operation::RemoveTeamRole { .. } => "remove-team-role",
        }
    }

    /// Whether the response body is parsed.
    ///
    /// Role removals only look at the status code; the API answers them
    /// without a meaningful body. User and team deletions do return the
    /// deleted entity and are printed from it.
    pub fn expects_body(&self) -> bool {
        !matches!(
            self,
            Operation::RemoveUserRole { .. } | Operation::RemoveTeamRole { .. }
        )
    }

    /// Build the request descriptor for this operation
    pub fn request(&self) -> ApiRequest {
        match self {
            Operation::ListAccounts => ApiRequest::new(Method::Get, "/accounts/"),
            Operation::ListUsers { account_id } => {
                ApiRequest::new(Method::Get, format!("/accounts/{}/users", seg(account_id)))
            }
            Operation::CreateUser {
                account_id,
                name,
                email,
                phone,
            } => ApiRequest::new(Method::Post, format!("/accounts/{}/users", seg(account_id)))
                .with_body(json!({
                    "name": name,
                    "email": email,
                    "phone": phone,
                })),
            Operation::DeleteUser {
                account_id,
                user_id,
            } => ApiRequest::new(
                Method::Delete,
                format!("/accounts/{}/users/{}", seg(account_id), seg(user_id)),
            ),
            Operation::ListTeams => ApiRequest::new(Method::Get, "/teams"),
            Operation::CreateTeam { name } => {
                ApiRequest::new(Method::Post, "/teams").with_body(json!({ "team": { "name": name } }))
            }
            Operation::RenameTeam { team_id, name } => {
                ApiRequest::new(Method::Patch, format!("/teams/{}", seg(team_id)))
                    .with_body(json!({ "team": { "name": name } }))
            }
            Operation::DeleteTeam { team_id } => {
                ApiRequest::new(Method::Delete, format!("/teams/{}", seg(team_id)))
            }
            Operation::AddTeamUsers { team_id, user_ids } => {
                ApiRequest::new(Method::Put, format!("/teams/{}/users", seg(team_id)))
                    .with_body(json!({ "user_ids": user_ids }))
            }
            Operation::ListDeployments => ApiRequest::new(Method::Get, "/deployments"),
            Operation::ListUserRoles { deployment_id } => ApiRequest::new(
                Method::Get,
                format!("/deployments/{}/roles", seg(deployment_id)),
            ),
            Operation::AssignUserRole {
                deployment_id,
                user_id,
                role,
            } => ApiRequest::new(
                Method::Post,
                format!("/deployments/{}/roles", seg(deployment_id)),
            )
            .with_body(user_role_body(user_id, role)),
            Operation::RemoveUserRole {
                deployment_id,
                user_id,
                role,
            } => ApiRequest::new(
                Method::Delete,
                format!("/deployments/{}/roles", seg(deployment_id)),
            )
            .with_body(user_role_body(user_id, role)),
            Operation::ListTeamRoles { deployment_id } => ApiRequest::new(
                Method::Get,
                format!("/deployments/{}/team_roles", seg(deployment_id)),
            ),
            Operation::AssignTeamRole {
                deployment_id,
                team_id,
                role,
            } => ApiRequest::new(
                Method::Post,
                format!("/deployments/{}/team_roles", seg(deployment_id)),
            )
            .with_body(team_role_body(team_id, role)),
            Operation::RemoveTeamRole {
                deployment_id,
                team_id,
                role,
            } => ApiRequest::new(
                Method::Delete,
                format!("/deployments/{}/team_roles", seg(deployment_id)),
            )
            .with_body(team_role_body(team_id, role)),
        }
    }
}

fn user_role_body(user_id: &str, role: &str) -> Value {
    json!({ "role": { "name": role, "user_id": user_id } })
}

fn team_role_body(team_id: &str, role: &str) -> Value {
    json!({ "team_role": { "name": role, "team_id": team_id } })
}
