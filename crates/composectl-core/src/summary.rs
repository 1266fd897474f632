//! Human-readable summaries of API responses
//!
//! One line per item, fixed layout per operation. Ids and names are printed
//! as returned; membership lists are printed as compact JSON. Empty or
//! absent collections produce no lines at all.

use serde_json::Value;

use crate::dispatch::Outcome;
use crate::error::{CoreError, Result};
use crate::models::{Account, Deployment, Role, Team, TeamRole, User, embedded, entity};
use crate::operation::Operation;

const REMOVED_USER_ROLE: &str = "Removed user role";
const REMOVED_TEAM_ROLE: &str = "Removed team role";

/// Render the summary lines for an operation's outcome
pub fn summarize(operation: &Operation, outcome: &Outcome) -> Result<Vec<String>> {
    let body = match outcome {
        Outcome::Accepted { .. } => {
            return match operation {
                Operation::RemoveUserRole { .. } => Ok(vec![REMOVED_USER_ROLE.to_string()]),
                Operation::RemoveTeamRole { .. } => Ok(vec![REMOVED_TEAM_ROLE.to_string()]),
                other => Err(CoreError::MissingBody {
                    operation: other.command_name(),
                }),
            };
        }
        Outcome::Body(body) => body,
    };

    let lines = match operation {
        Operation::ListAccounts => embedded::<Account>(body, "accounts")?
            .into_iter()
            .map(|a| format!("Account id: {}", a.id))
            .collect(),
        Operation::ListUsers { .. } => embedded::<User>(body, "users")?
            .into_iter()
            .map(|u| format!("{} {}", u.id, u.name))
            .collect(),
        Operation::CreateUser { .. } => {
            let user: User = entity(body)?;
            vec![format!("Added user: {} {}", user.id, user.name)]
        }
        Operation::DeleteUser { .. } => {
            let user: User = entity(body)?;
            vec![format!("Removed user: {} {}", user.id, user.name)]
        }
        Operation::ListTeams => embedded::<Team>(body, "teams")?
            .into_iter()
            .map(|t| format!("{} {} {}", t.id, t.name, compact(&t.users)))
            .collect(),
        Operation::CreateTeam { .. } => {
            let team: Team = entity(body)?;
            vec![format!("Team Created: {} {}", team.id, team.name)]
        }
        Operation::RenameTeam { .. } => {
            let team: Team = entity(body)?;
            vec![format!(
                "Team updated: {} {} {}",
                team.id,
                team.name,
                compact(&team.users)
            )]
        }
        Operation::DeleteTeam { .. } => {
            let team: Team = entity(body)?;
            vec![format!("Removed Team: {} {}", team.id, team.name)]
        }
        Operation::AddTeamUsers { .. } => {
            let team: Team = entity(body)?;
            vec![format!("{} {} {}", team.id, team.name, compact(&team.users))]
        }
        Operation::ListDeployments => embedded::<Deployment>(body, "deployments")?
            .into_iter()
            .flat_map(|d| {
                [
                    format!("Deployment id: {}", d.id),
                    format!("Deployment name: {}", d.name),
                    format!("Deployment type: {}", d.kind),
                    "----".to_string(),
                ]
            })
            .collect(),
        Operation::ListUserRoles { .. } => embedded::<Role>(body, "roles")?
            .into_iter()
            .map(|r| format!("{} {}", r.name, compact(&r.users)))
            .collect(),
        Operation::AssignUserRole { .. } => {
            let role: Role = entity(body)?;
            vec![format!(
                "User Role Assigned: {} {}",
                role.name,
                compact(&role.users)
            )]
        }
        Operation::ListTeamRoles { .. } => embedded::<TeamRole>(body, "team_roles")?
            .into_iter()
            .map(|r| format!("{} {}", r.name, compact(&r.teams)))
            .collect(),
        Operation::AssignTeamRole { .. } => {
            let role: TeamRole = entity(body)?;
            vec![format!(
                "Team Role Assigned: {} {}",
                role.name,
                compact(&role.teams)
            )]
        }
        // Status-only operations never carry a parsed body
        Operation::RemoveUserRole { .. } => vec![REMOVED_USER_ROLE.to_string()],
        Operation::RemoveTeamRole { .. } => vec![REMOVED_TEAM_ROLE.to_string()],
    };

    Ok(lines)
}

fn compact(value: &Value) -> String {
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn s(v: &str) -> String {
        v.to_string()
    }

    fn lines(op: Operation, body: Value) -> Vec<String> {
        summarize(&op, &Outcome::Body(body)).unwrap()
    }

    #[test]
    fn test_accounts() {
        let body = json!({"_embedded": {"accounts": [{"id": "a1"}, {"id": "a2"}]}});
        assert_eq!(
            lines(Operation::ListAccounts, body),
            vec!["Account id: a1", "Account id: a2"]
        );
    }

    #[test]
    fn test_users_empty_and_absent_print_nothing() {
        let op = Operation::ListUsers {
            account_id: s("A"),
        };
        assert!(lines(op.clone(), json!({"_embedded": {"users": []}})).is_empty());
        assert!(lines(op, json!({})).is_empty());
    }

    #[test]
    fn test_users() {
        let body = json!({"_embedded": {"users": [{"id": "u1", "name": "Ada Lovelace"}]}});
        assert_eq!(
            lines(
                Operation::ListUsers {
                    account_id: s("A")
                },
                body
            ),
            vec!["u1 Ada Lovelace"]
        );
    }

    #[test]
    fn test_create_and_delete_user() {
        let body = json!({"id": "u9", "name": "Grace", "email": "g@example.com"});
        let create = Operation::CreateUser {
            account_id: s("A"),
            name: s("Grace"),
            email: s("g@example.com"),
            phone: None,
        };
        assert_eq!(lines(create, body.clone()), vec!["Added user: u9 Grace"]);

        let delete = Operation::DeleteUser {
            account_id: s("A"),
            user_id: s("u9"),
        };
        assert_eq!(lines(delete, body), vec!["Removed user: u9 Grace"]);
    }

    #[test]
    fn test_teams_print_members_as_json() {
        let body = json!({"_embedded": {"teams": [
            {"id": "t1", "name": "ops", "users": [{"id": "u1", "name": "Ada"}]},
            {"id": "t2", "name": "empty"}
        ]}});
        assert_eq!(
            lines(Operation::ListTeams, body),
            vec![
                r#"t1 ops [{"id":"u1","name":"Ada"}]"#,
                "t2 empty null",
            ]
        );
    }

    #[test]
    fn test_team_created_verbatim() {
        let body = json!({"id": "5a8f3c  ", "name": "  Data Team"});
        assert_eq!(
            lines(Operation::CreateTeam { name: s("x") }, body),
            vec!["Team Created: 5a8f3c     Data Team"]
        );
    }

    #[test]
    fn test_team_updates() {
        let body = json!({"id": "t1", "name": "sre", "users": []});
        assert_eq!(
            lines(
                Operation::RenameTeam {
                    team_id: s("t1"),
                    name: s("sre")
                },
                body.clone()
            ),
            vec!["Team updated: t1 sre []"]
        );
        assert_eq!(
            lines(Operation::DeleteTeam { team_id: s("t1") }, body.clone()),
            vec!["Removed Team: t1 sre"]
        );
        assert_eq!(
            lines(
                Operation::AddTeamUsers {
                    team_id: s("t1"),
                    user_ids: vec![s("u1")]
                },
                body
            ),
            vec!["t1 sre []"]
        );
    }

    #[test]
    fn test_deployments_block_layout() {
        let body = json!({"_embedded": {"deployments": [
            {"id": "d1", "name": "prod-pg", "type": "postgresql"}
        ]}});
        assert_eq!(
            lines(Operation::ListDeployments, body),
            vec![
                "Deployment id: d1",
                "Deployment name: prod-pg",
                "Deployment type: postgresql",
                "----",
            ]
        );
    }

    #[test]
    fn test_roles() {
        let body = json!({"_embedded": {"roles": [
            {"name": "admin", "users": [{"id": "u1"}]}
        ]}});
        assert_eq!(
            lines(
                Operation::ListUserRoles {
                    deployment_id: s("D")
                },
                body
            ),
            vec![r#"admin [{"id":"u1"}]"#]
        );

        let body = json!({"_embedded": {"team_roles": [
            {"name": "developer", "teams": [{"id": "t1"}]}
        ]}});
        assert_eq!(
            lines(
                Operation::ListTeamRoles {
                    deployment_id: s("D")
                },
                body
            ),
            vec![r#"developer [{"id":"t1"}]"#]
        );
    }

    #[test]
    fn test_role_assignment() {
        let body = json!({"name": "manager", "users": [{"id": "u1"}]});
        assert_eq!(
            lines(
                Operation::AssignUserRole {
                    deployment_id: s("D"),
                    user_id: s("u1"),
                    role: s("manager")
                },
                body
            ),
            vec![r#"User Role Assigned: manager [{"id":"u1"}]"#]
        );

        let body = json!({"name": "admin", "teams": [{"id": "t1"}]});
        assert_eq!(
            lines(
                Operation::AssignTeamRole {
                    deployment_id: s("D"),
                    team_id: s("t1"),
                    role: s("admin")
                },
                body
            ),
            vec![r#"Team Role Assigned: admin [{"id":"t1"}]"#]
        );
    }

    #[test]
    fn test_role_removal_fixed_lines() {
        let user_role = Operation::RemoveUserRole {
            deployment_id: s("D"),
            user_id: s("U"),
            role: s("R"),
        };
        assert_eq!(
            summarize(&user_role, &Outcome::Accepted { status: 204 }).unwrap(),
            vec!["Removed user role"]
        );

        let team_role = Operation::RemoveTeamRole {
            deployment_id: s("D"),
            team_id: s("T"),
            role: s("R"),
        };
        assert_eq!(
            summarize(&team_role, &Outcome::Accepted { status: 200 }).unwrap(),
            vec!["Removed team role"]
        );
    }

    #[test]
    fn test_status_only_outcome_for_body_operation_is_error() {
        let delete_user = Operation::DeleteUser {
            account_id: s("A"),
            user_id: s("U"),
        };
        let err = summarize(&delete_user, &Outcome::Accepted { status: 200 }).unwrap_err();
        assert!(matches!(
            err,
            CoreError::MissingBody {
                operation: "remove-user"
            }
        ));

        let err = summarize(&Operation::ListTeams, &Outcome::Accepted { status: 204 }).unwrap_err();
        assert!(matches!(err, CoreError::MissingBody { operation: "teams" }));
    }

    #[test]
    fn test_malformed_collection_is_error() {
        let body = json!({"_embedded": {"teams": {"not": "a list"}}});
        assert!(summarize(&Operation::ListTeams, &Outcome::Body(body)).is_err());
    }
}
