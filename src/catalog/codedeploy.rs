//! `AWS::CodeDeploy::*` schemas.

use crate::catalog::Tag;
use crate::value::Value;
use crate::{property_type, resource_type};

resource_type! {
    #[derive(Default)]
    pub struct Application("AWS::CodeDeploy::Application") {
        optional application_name: Value = "ApplicationName",
        /// `Server`, `Lambda` or `ECS`.
        optional compute_platform: Value = "ComputePlatform",
        optional tags: Vec<Tag> = "Tags",
    }
}

resource_type! {
    /// A set of instances, Lambda functions or ECS services targeted by a
    /// deployment.
    pub struct DeploymentGroup("AWS::CodeDeploy::DeploymentGroup") {
        optional alarm_configuration: AlarmConfiguration = "AlarmConfiguration",
        required application_name: Value = "ApplicationName",
        optional auto_rollback_configuration: AutoRollbackConfiguration =
            "AutoRollbackConfiguration",
        optional auto_scaling_groups: Value = "AutoScalingGroups",
        optional blue_green_deployment_configuration: BlueGreenDeploymentConfiguration =
            "BlueGreenDeploymentConfiguration",
        optional deployment: Deployment = "Deployment",
        optional deployment_config_name: Value = "DeploymentConfigName",
        optional deployment_group_name: Value = "DeploymentGroupName",
        optional deployment_style: DeploymentStyle = "DeploymentStyle",
        optional ecs_services: Vec<ECSService> = "ECSServices",
        optional ec2_tag_filters: Vec<EC2TagFilter> = "Ec2TagFilters",
        optional ec2_tag_set: EC2TagSet = "Ec2TagSet",
        optional load_balancer_info: LoadBalancerInfo = "LoadBalancerInfo",
        optional on_premises_instance_tag_filters: Vec<TagFilter> = "OnPremisesInstanceTagFilters",
        optional on_premises_tag_set: OnPremisesTagSet = "OnPremisesTagSet",
        required service_role_arn: Value = "ServiceRoleArn",
        optional trigger_configurations: Vec<TriggerConfig> = "TriggerConfigurations",
    }
}

impl DeploymentGroup {
    pub fn new(application_name: impl Into<Value>, service_role_arn: impl Into<Value>) -> Self {
        DeploymentGroup {
            alarm_configuration: None,
            application_name: application_name.into(),
            auto_rollback_configuration: None,
            auto_scaling_groups: None,
            blue_green_deployment_configuration: None,
            deployment: None,
            deployment_config_name: None,
            deployment_group_name: None,
            deployment_style: None,
            ecs_services: None,
            ec2_tag_filters: None,
            ec2_tag_set: None,
            load_balancer_info: None,
            on_premises_instance_tag_filters: None,
            on_premises_tag_set: None,
            service_role_arn: service_role_arn.into(),
            trigger_configurations: None,
            attributes: Default::default(),
        }
    }
}

property_type! {
    pub struct AlarmConfiguration("AWS::CodeDeploy::DeploymentGroup.AlarmConfiguration") {
        optional alarms: Vec<Alarm> = "Alarms",
        optional enabled: Value = "Enabled",
        optional ignore_poll_alarm_failure: Value = "IgnorePollAlarmFailure",
    }
}

property_type! {
    pub struct Alarm("AWS::CodeDeploy::DeploymentGroup.Alarm") {
        optional name: Value = "Name",
    }
}

property_type! {
    pub struct AutoRollbackConfiguration("AWS::CodeDeploy::DeploymentGroup.AutoRollbackConfiguration") {
        optional enabled: Value = "Enabled",
        /// `DEPLOYMENT_FAILURE`, `DEPLOYMENT_STOP_ON_ALARM` or `DEPLOYMENT_STOP_ON_REQUEST`.
        optional events: Value = "Events",
    }
}

property_type! {
    pub struct BlueGreenDeploymentConfiguration(
        "AWS::CodeDeploy::DeploymentGroup.BlueGreenDeploymentConfiguration"
    ) {
        optional deployment_ready_option: DeploymentReadyOption = "DeploymentReadyOption",
        optional green_fleet_provisioning_option: GreenFleetProvisioningOption =
            "GreenFleetProvisioningOption",
        optional terminate_blue_instances_on_deployment_success: BlueInstanceTerminationOption =
            "TerminateBlueInstancesOnDeploymentSuccess",
    }
}

property_type! {
    pub struct DeploymentReadyOption("AWS::CodeDeploy::DeploymentGroup.DeploymentReadyOption") {
        optional action_on_timeout: Value = "ActionOnTimeout",
        optional wait_time_in_minutes: Value = "WaitTimeInMinutes",
    }
}

property_type! {
    pub struct GreenFleetProvisioningOption(
        "AWS::CodeDeploy::DeploymentGroup.GreenFleetProvisioningOption"
    ) {
        optional action: Value = "Action",
    }
}

property_type! {
    pub struct BlueInstanceTerminationOption(
        "AWS::CodeDeploy::DeploymentGroup.BlueInstanceTerminationOption"
    ) {
        optional action: Value = "Action",
        optional termination_wait_time_in_minutes: Value = "TerminationWaitTimeInMinutes",
    }
}

property_type! {
    pub struct Deployment("AWS::CodeDeploy::DeploymentGroup.Deployment") {
        optional description: Value = "Description",
        optional ignore_application_stop_failures: Value = "IgnoreApplicationStopFailures",
        required revision: RevisionLocation = "Revision",
    }
}

property_type! {
    pub struct RevisionLocation("AWS::CodeDeploy::DeploymentGroup.RevisionLocation") {
        optional git_hub_location: GitHubLocation = "GitHubLocation",
        optional revision_type: Value = "RevisionType",
        optional s3_location: S3Location = "S3Location",
    }
}

property_type! {
    pub struct GitHubLocation("AWS::CodeDeploy::DeploymentGroup.GitHubLocation") {
        required commit_id: Value = "CommitId",
        required repository: Value = "Repository",
    }
}

property_type! {
    pub struct S3Location("AWS::CodeDeploy::DeploymentGroup.S3Location") {
        required bucket: Value = "Bucket",
        optional bundle_type: Value = "BundleType",
        optional e_tag: Value = "ETag",
        required key: Value = "Key",
        optional version: Value = "Version",
    }
}

property_type! {
    pub struct DeploymentStyle("AWS::CodeDeploy::DeploymentGroup.DeploymentStyle") {
        /// `WITH_TRAFFIC_CONTROL` or `WITHOUT_TRAFFIC_CONTROL`.
        optional deployment_option: Value = "DeploymentOption",
        /// `IN_PLACE` or `BLUE_GREEN`.
        optional deployment_type: Value = "DeploymentType",
    }
}

property_type! {
    pub struct ECSService("AWS::CodeDeploy::DeploymentGroup.ECSService") {
        required cluster_name: Value = "ClusterName",
        required service_name: Value = "ServiceName",
    }
}

property_type! {
    pub struct EC2TagFilter("AWS::CodeDeploy::DeploymentGroup.EC2TagFilter") {
        optional key: Value = "Key",
        optional r#type: Value = "Type",
        optional value: Value = "Value",
    }
}

property_type! {
    pub struct EC2TagSet("AWS::CodeDeploy::DeploymentGroup.EC2TagSet") {
        optional ec2_tag_set_list: Vec<EC2TagSetListObject> = "Ec2TagSetList",
    }
}

property_type! {
    pub struct EC2TagSetListObject("AWS::CodeDeploy::DeploymentGroup.EC2TagSetListObject") {
        optional ec2_tag_group: Vec<EC2TagFilter> = "Ec2TagGroup",
    }
}

property_type! {
    pub struct LoadBalancerInfo("AWS::CodeDeploy::DeploymentGroup.LoadBalancerInfo") {
        optional elb_info_list: Vec<ELBInfo> = "ElbInfoList",
        optional target_group_info_list: Vec<TargetGroupInfo> = "TargetGroupInfoList",
        optional target_group_pair_info_list: Vec<TargetGroupPairInfo> = "TargetGroupPairInfoList",
    }
}

property_type! {
    pub struct ELBInfo("AWS::CodeDeploy::DeploymentGroup.ELBInfo") {
        optional name: Value = "Name",
    }
}

property_type! {
    pub struct TargetGroupInfo("AWS::CodeDeploy::DeploymentGroup.TargetGroupInfo") {
        optional name: Value = "Name",
    }
}

property_type! {
    pub struct TargetGroupPairInfo("AWS::CodeDeploy::DeploymentGroup.TargetGroupPairInfo") {
        optional prod_traffic_route: TrafficRoute = "ProdTrafficRoute",
        optional target_groups: Vec<TargetGroupInfo> = "TargetGroups",
        optional test_traffic_route: TrafficRoute = "TestTrafficRoute",
    }
}

property_type! {
    pub struct TrafficRoute("AWS::CodeDeploy::DeploymentGroup.TrafficRoute") {
        optional listener_arns: Value = "ListenerArns",
    }
}

property_type! {
    pub struct TagFilter("AWS::CodeDeploy::DeploymentGroup.TagFilter") {
        optional key: Value = "Key",
        optional r#type: Value = "Type",
        optional value: Value = "Value",
    }
}

property_type! {
    pub struct OnPremisesTagSet("AWS::CodeDeploy::DeploymentGroup.OnPremisesTagSet") {
        optional on_premises_tag_set_list: Vec<OnPremisesTagSetListObject> =
            "OnPremisesTagSetList",
    }
}

property_type! {
    pub struct OnPremisesTagSetListObject(
        "AWS::CodeDeploy::DeploymentGroup.OnPremisesTagSetListObject"
    ) {
        optional on_premises_tag_group: Vec<TagFilter> = "OnPremisesTagGroup",
    }
}

property_type! {
    pub struct TriggerConfig("AWS::CodeDeploy::DeploymentGroup.TriggerConfig") {
        optional trigger_events: Value = "TriggerEvents",
        optional trigger_name: Value = "TriggerName",
        optional trigger_target_arn: Value = "TriggerTargetArn",
    }
}
