//! Reconciliation engine
//!
//! Merges the desired state from the input file with the server snapshot and
//! produces, per user, the complete role set to send. The membership update
//! replaces everything the user holds, so roles are rebuilt from scratch
//! rather than diffed. Auto-set roles are never emitted.

use crate::desired::DesiredState;
use crate::error::PatternError;
use crate::ptai::types::{Directory, MembershipUpdate, ProjectRef, RoleAssignment, User};
use crate::reconcile::matcher::ProjectMatcher;
use crate::reconcile::types::{ReconciledUser, Reconciliation, RoleDelta, ValidationWarning};
use std::collections::HashSet;
use tracing::debug;

/// Compute replacement memberships for every user named in `desired`.
///
/// Users missing on the server and rows with unknown roles are skipped with a
/// warning. An invalid pattern aborts the whole pass.
pub fn reconcile(
    desired: &DesiredState,
    directory: &Directory,
) -> Result<Reconciliation, PatternError> {
    let catalog: HashSet<&str> = directory.roles.iter().map(|r| r.name.as_str()).collect();
    let mut result = Reconciliation::default();

    for user_rules in desired.users() {
        let Some(user) = directory
            .users
            .iter()
            .find(|u| u.name == user_rules.username)
        else {
            debug!(user = %user_rules.username, "User not found on server");
            result.warnings.push(ValidationWarning::UnknownUser {
                user: user_rules.username.clone(),
            });
            continue;
        };

        let mut groups: Vec<RoleAssignment> = Vec::new();
        for rule in &user_rules.rules {
            if !catalog.contains(rule.role.as_str()) {
                debug!(user = %user.name, role = %rule.role, "Unknown role");
                result.warnings.push(ValidationWarning::UnknownRole {
                    user: user.name.clone(),
                    role: rule.role.clone(),
                });
                continue;
            }

            let matched =
                ProjectMatcher::new(&rule.pattern)?.matching_projects(&directory.projects);
            debug!(
                user = %user.name,
                pattern = %rule.pattern,
                matched = matched.len(),
                "Pattern evaluated"
            );

            let index = match groups.iter().position(|g| g.name == rule.role) {
                Some(index) => index,
                None => {
                    groups.push(RoleAssignment::managed(rule.role.as_str()));
                    groups.len() - 1
                }
            };
            let group = &mut groups[index];
            for project in matched {
                if !group.projects.contains(&project) {
                    group.projects.push(project);
                }
            }
        }

        if groups.is_empty() {
            debug!(user = %user.name, "No valid roles, update would clear all roles");
            result.warnings.push(ValidationWarning::NoValidRoles {
                user: user.name.clone(),
            });
        }

        result.users.push(ReconciledUser {
            user_name: user.name.clone(),
            is_new: user.roles.iter().all(|r| r.auto_set),
            revoked: revoked_roles(user, &groups),
            deltas: role_deltas(user, &groups),
            update: MembershipUpdate {
                user_id: user.id,
                roles: groups,
            },
        });
    }

    Ok(result)
}

/// Current non-auto-set roles that the new role set no longer contains
fn revoked_roles(user: &User, groups: &[RoleAssignment]) -> Vec<String> {
    let mut revoked: Vec<String> = Vec::new();
    for role in user.roles.iter().filter(|r| !r.auto_set) {
        if groups.iter().all(|g| g.name != role.name) && !revoked.contains(&role.name) {
            revoked.push(role.name.clone());
        }
    }
    revoked
}

/// Project changes for every role the user keeps
fn role_deltas(user: &User, groups: &[RoleAssignment]) -> Vec<RoleDelta> {
    let mut deltas = Vec::new();

    for group in groups {
        let current: Vec<&RoleAssignment> = user
            .roles
            .iter()
            .filter(|r| !r.auto_set && r.name == group.name)
            .collect();
        if current.is_empty() {
            continue;
        }

        let held: Vec<&ProjectRef> = current.iter().flat_map(|r| r.projects.iter()).collect();
        let mut delta = RoleDelta {
            role: group.name.clone(),
            all_projects_revoked: current.iter().any(|r| r.all_projects) && !group.all_projects,
            ..Default::default()
        };
        for project in &group.projects {
            if held.iter().all(|h| h.id != project.id) {
                delta.granted.push(project.name.clone());
            }
        }
        for project in held {
            if group.projects.iter().all(|p| p.id != project.id)
                && !delta.revoked.contains(&project.name)
            {
                delta.revoked.push(project.name.clone());
            }
        }

        if !delta.is_unchanged() {
            deltas.push(delta);
        }
    }

    deltas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ptai::types::{Project, ProjectRef, Role};

    fn directory(roles: &[&str]) -> Directory {
        Directory {
            projects: vec![
                Project {
                    id: 1,
                    name: "Foobar".into(),
                },
                Project {
                    id: 2,
                    name: "Barcelona".into(),
                },
                Project {
                    id: 3,
                    name: "Baz".into(),
                },
            ],
            users: vec![User {
                id: 10,
                name: "alice".into(),
                roles: vec![],
            }],
            roles: roles
                .iter()
                .map(|r| Role {
                    name: r.to_string(),
                })
                .collect(),
        }
    }

    fn project(id: i64, name: &str) -> ProjectRef {
        ProjectRef {
            id,
            name: name.into(),
        }
    }

    #[test]
    fn test_role_groups_in_first_seen_order() {
        let mut desired = DesiredState::default();
        desired.insert("alice", "^Foo.*$", "Auditor");
        desired.insert("alice", "^Bar.*$", "Developer");

        let result = reconcile(&desired, &directory(&["Auditor", "Developer"])).unwrap();

        let alice = result.find("alice").unwrap();
        assert_eq!(alice.update.user_id, 10);
        assert_eq!(alice.update.roles.len(), 2);
        assert_eq!(alice.update.roles[0].name, "Auditor");
        assert_eq!(alice.update.roles[0].projects, vec![project(1, "Foobar")]);
        assert_eq!(alice.update.roles[1].name, "Developer");
        assert_eq!(alice.update.roles[1].projects, vec![project(2, "Barcelona")]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_same_project_may_appear_under_two_roles() {
        let mut desired = DesiredState::default();
        desired.insert("alice", "Foo", "Auditor");
        desired.insert("alice", "F", "Developer");

        let result = reconcile(&desired, &directory(&["Auditor", "Developer"])).unwrap();
        let roles = &result.find("alice").unwrap().update.roles;
        assert_eq!(roles[0].projects, vec![project(1, "Foobar")]);
        assert_eq!(roles[1].projects, vec![project(1, "Foobar")]);
    }

    #[test]
    fn test_overlapping_patterns_union_without_duplicates() {
        let mut desired = DesiredState::default();
        desired.insert("alice", "Ba", "Auditor");
        desired.insert("alice", "Baz", "Auditor");

        let result = reconcile(&desired, &directory(&["Auditor"])).unwrap();
        let roles = &result.find("alice").unwrap().update.roles;
        assert_eq!(roles.len(), 1);
        assert_eq!(
            roles[0].projects,
            vec![project(2, "Barcelona"), project(3, "Baz")]
        );
    }

    #[test]
    fn test_emitted_roles_are_never_auto_set() {
        let mut desired = DesiredState::default();
        desired.insert("alice", "Foo", "Auditor");

        let result = reconcile(&desired, &directory(&["Auditor"])).unwrap();
        let role = &result.find("alice").unwrap().update.roles[0];
        assert!(!role.auto_set);
        assert!(!role.all_projects);
    }

    #[test]
    fn test_invalid_pattern_aborts() {
        let mut desired = DesiredState::default();
        desired.insert("alice", "Foo", "Auditor");
        desired.insert("alice", "[broken", "Auditor");

        let err = reconcile(&desired, &directory(&["Auditor"])).unwrap_err();
        assert_eq!(err.pattern, "[broken");
    }

    #[test]
    fn test_invalid_pattern_on_unknown_role_is_skipped_first() {
        let mut desired = DesiredState::default();
        desired.insert("alice", "[broken", "Nobody");

        let result = reconcile(&desired, &directory(&["Auditor"])).unwrap();
        assert_eq!(
            result.warnings,
            vec![
                ValidationWarning::UnknownRole {
                    user: "alice".into(),
                    role: "Nobody".into()
                },
                ValidationWarning::NoValidRoles {
                    user: "alice".into()
                },
            ]
        );
    }

    #[test]
    fn test_revoked_roles_ignore_auto_set() {
        let mut dir = directory(&["Auditor", "Developer"]);
        dir.users[0].roles = vec![
            RoleAssignment {
                auto_set: true,
                ..RoleAssignment::managed("Viewer")
            },
            RoleAssignment::managed("Developer"),
            RoleAssignment::managed("Auditor"),
        ];
        let mut desired = DesiredState::default();
        desired.insert("alice", "Foo", "Auditor");

        let result = reconcile(&desired, &dir).unwrap();
        let alice = result.find("alice").unwrap();
        assert_eq!(alice.revoked, vec!["Developer"]);
        assert!(!alice.is_new);
    }

    #[test]
    fn test_kept_role_reports_lost_and_gained_projects() {
        let mut dir = directory(&["Auditor"]);
        dir.users[0].roles = vec![RoleAssignment {
            projects: vec![project(3, "Baz")],
            ..RoleAssignment::managed("Auditor")
        }];
        let mut desired = DesiredState::default();
        desired.insert("alice", "^Foo", "Auditor");

        let result = reconcile(&desired, &dir).unwrap();
        let alice = result.find("alice").unwrap();

        assert!(alice.revoked.is_empty());
        assert_eq!(
            alice.deltas,
            vec![RoleDelta {
                role: "Auditor".into(),
                granted: vec!["Foobar".into()],
                revoked: vec!["Baz".into()],
                all_projects_revoked: false,
            }]
        );
        assert!(alice.revokes_anything());
    }

    #[test]
    fn test_unchanged_role_has_no_delta() {
        let mut dir = directory(&["Auditor"]);
        dir.users[0].roles = vec![RoleAssignment {
            projects: vec![project(1, "Foobar")],
            ..RoleAssignment::managed("Auditor")
        }];
        let mut desired = DesiredState::default();
        desired.insert("alice", "^Foo", "Auditor");

        let result = reconcile(&desired, &dir).unwrap();
        let alice = result.find("alice").unwrap();
        assert!(alice.deltas.is_empty());
        assert!(!alice.revokes_anything());
    }

    #[test]
    fn test_losing_all_projects_access_is_reported() {
        let mut dir = directory(&["Auditor"]);
        dir.users[0].roles = vec![RoleAssignment {
            all_projects: true,
            ..RoleAssignment::managed("Auditor")
        }];
        let mut desired = DesiredState::default();
        desired.insert("alice", "^Foo", "Auditor");

        let result = reconcile(&desired, &dir).unwrap();
        assert!(result.find("alice").unwrap().deltas[0].all_projects_revoked);
    }

    #[test]
    fn test_user_with_only_auto_set_roles_is_new() {
        let mut dir = directory(&["Auditor"]);
        dir.users[0].roles = vec![RoleAssignment {
            auto_set: true,
            ..RoleAssignment::managed("Viewer")
        }];
        let mut desired = DesiredState::default();
        desired.insert("alice", "^Foo", "Auditor");

        let result = reconcile(&desired, &dir).unwrap();
        let alice = result.find("alice").unwrap();
        assert!(alice.is_new);
        assert!(alice.deltas.is_empty());
    }
}
