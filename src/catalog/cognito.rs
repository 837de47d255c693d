//! `AWS::Cognito::UserPoolRiskConfigurationAttachment` schema.

use crate::value::Value;
use crate::{property_type, resource_type};

resource_type! {
    /// Advanced-security risk settings for a user pool client.
    pub struct UserPoolRiskConfigurationAttachment(
        "AWS::Cognito::UserPoolRiskConfigurationAttachment"
    ) {
        optional account_takeover_risk_configuration: AccountTakeoverRiskConfigurationType =
            "AccountTakeoverRiskConfiguration",
        required client_id: Value = "ClientId",
        optional compromised_credentials_risk_configuration:
            CompromisedCredentialsRiskConfigurationType = "CompromisedCredentialsRiskConfiguration",
        optional risk_exception_configuration: RiskExceptionConfigurationType =
            "RiskExceptionConfiguration",
        required user_pool_id: Value = "UserPoolId",
    }
}

property_type! {
    pub struct AccountTakeoverRiskConfigurationType(
        "AWS::Cognito::UserPoolRiskConfigurationAttachment.AccountTakeoverRiskConfigurationType"
    ) {
        required actions: AccountTakeoverActionsType = "Actions",
        optional notify_configuration: NotifyConfigurationType = "NotifyConfiguration",
    }
}

property_type! {
    pub struct AccountTakeoverActionsType(
        "AWS::Cognito::UserPoolRiskConfigurationAttachment.AccountTakeoverActionsType"
    ) {
        optional high_action: AccountTakeoverActionType = "HighAction",
        optional low_action: AccountTakeoverActionType = "LowAction",
        optional medium_action: AccountTakeoverActionType = "MediumAction",
    }
}

property_type! {
    pub struct AccountTakeoverActionType(
        "AWS::Cognito::UserPoolRiskConfigurationAttachment.AccountTakeoverActionType"
    ) {
        /// `BLOCK`, `MFA_IF_CONFIGURED`, `MFA_REQUIRED` or `NO_ACTION`.
        required event_action: Value = "EventAction",
        required notify: Value = "Notify",
    }
}

property_type! {
    /// Where and how users are notified about risky sign-ins.
    pub struct NotifyConfigurationType(
        "AWS::Cognito::UserPoolRiskConfigurationAttachment.NotifyConfigurationType"
    ) {
        optional block_email: NotifyEmailType = "BlockEmail",
        optional from: Value = "From",
        optional mfa_email: NotifyEmailType = "MfaEmail",
        optional no_action_email: NotifyEmailType = "NoActionEmail",
        optional reply_to: Value = "ReplyTo",
        required source_arn: Value = "SourceArn",
    }
}

property_type! {
    pub struct NotifyEmailType("AWS::Cognito::UserPoolRiskConfigurationAttachment.NotifyEmailType") {
        optional html_body: Value = "HtmlBody",
        required subject: Value = "Subject",
        optional text_body: Value = "TextBody",
    }
}

property_type! {
    pub struct CompromisedCredentialsRiskConfigurationType(
        "AWS::Cognito::UserPoolRiskConfigurationAttachment.CompromisedCredentialsRiskConfigurationType"
    ) {
        required actions: CompromisedCredentialsActionsType = "Actions",
        optional event_filter: Value = "EventFilter",
    }
}

property_type! {
    pub struct CompromisedCredentialsActionsType(
        "AWS::Cognito::UserPoolRiskConfigurationAttachment.CompromisedCredentialsActionsType"
    ) {
        required event_action: Value = "EventAction",
    }
}

property_type! {
    pub struct RiskExceptionConfigurationType(
        "AWS::Cognito::UserPoolRiskConfigurationAttachment.RiskExceptionConfigurationType"
    ) {
        optional blocked_ip_range_list: Value = "BlockedIPRangeList",
        optional skipped_ip_range_list: Value = "SkippedIPRangeList",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::{decode_resource, encode_resource};
    use crate::{Error, FieldPath, Registry};
    use serde_json::json;

    fn path() -> FieldPath {
        FieldPath::new("Resources").child("Risk")
    }

    #[test]
    fn test_notify_configuration() {
        let raw = json!({
            "Type": "AWS::Cognito::UserPoolRiskConfigurationAttachment",
            "Properties": {
                "AccountTakeoverRiskConfiguration": {
                    "Actions": {
                        "HighAction": { "EventAction": "BLOCK", "Notify": true }
                    },
                    "NotifyConfiguration": {
                        "BlockEmail": { "Subject": "Blocked sign-in" },
                        "From": "security@example.com",
                        "SourceArn": { "Fn::GetAtt": ["SesIdentity", "Arn"] }
                    }
                },
                "ClientId": "ALL",
                "UserPoolId": { "Ref": "UserPool" }
            }
        });
        let resource = decode_resource(raw.clone(), &path(), &Registry::default()).unwrap();
        let attachment = resource
            .downcast_ref::<UserPoolRiskConfigurationAttachment>()
            .unwrap();
        let notify = attachment
            .account_takeover_risk_configuration
            .as_ref()
            .and_then(|c| c.notify_configuration.as_ref())
            .unwrap();
        assert_eq!(
            notify.block_email.as_ref().map(|e| e.subject.clone()),
            Some(Value::from("Blocked sign-in"))
        );
        assert_eq!(encode_resource(resource.as_ref()), raw);
    }

    #[test]
    fn test_fully_populated_round_trip() {
        let action = json!({ "EventAction": "MFA_REQUIRED", "Notify": true });
        let attachment =
            crate::catalog::assert_round_trip::<UserPoolRiskConfigurationAttachment>(json!({
                "Type": "AWS::Cognito::UserPoolRiskConfigurationAttachment",
                "Properties": {
                    "AccountTakeoverRiskConfiguration": {
                        "Actions": {
                            "HighAction": { "EventAction": "BLOCK", "Notify": true },
                            "LowAction": { "EventAction": "NO_ACTION", "Notify": false },
                            "MediumAction": action
                        },
                        "NotifyConfiguration": {
                            "BlockEmail": {
                                "HtmlBody": "<p>Blocked</p>",
                                "Subject": "Blocked sign-in",
                                "TextBody": "Blocked"
                            },
                            "From": "security@example.com",
                            "MfaEmail": { "Subject": "Confirm sign-in" },
                            "NoActionEmail": { "Subject": "New sign-in" },
                            "ReplyTo": "support@example.com",
                            "SourceArn": { "Fn::GetAtt": ["SesIdentity", "Arn"] }
                        }
                    },
                    "ClientId": { "Ref": "UserPoolClient" },
                    "CompromisedCredentialsRiskConfiguration": {
                        "Actions": { "EventAction": "BLOCK" },
                        "EventFilter": ["SIGN_IN", "PASSWORD_CHANGE"]
                    },
                    "RiskExceptionConfiguration": {
                        "BlockedIPRangeList": ["203.0.113.0/24"],
                        "SkippedIPRangeList": ["10.0.0.0/8"]
                    },
                    "UserPoolId": { "Ref": "UserPool" }
                },
                "DependsOn": ["UserPoolClient"]
            }));
        assert_eq!(attachment.attributes.depends_on, vec!["UserPoolClient"]);
    }

    #[test]
    fn test_notify_configuration_requires_source_arn() {
        let err = decode_resource(
            json!({
                "Type": "AWS::Cognito::UserPoolRiskConfigurationAttachment",
                "Properties": {
                    "ClientId": "ALL",
                    "UserPoolId": "pool",
                    "AccountTakeoverRiskConfiguration": {
                        "Actions": {},
                        "NotifyConfiguration": { "From": "a@b.c" }
                    }
                }
            }),
            &path(),
            &Registry::default(),
        )
        .unwrap_err();
        match err {
            Error::MissingRequiredProperty { path, property } => {
                assert_eq!(
                    path.as_str(),
                    "Resources.Risk.Properties.AccountTakeoverRiskConfiguration.NotifyConfiguration"
                );
                assert_eq!(property, "SourceArn");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
