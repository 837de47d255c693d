//! `AWS::ECS::*` schemas.

use crate::catalog::Tag;
use crate::value::Value;
use crate::{property_type, resource_type};

resource_type! {
    #[derive(Default)]
    pub struct Cluster("AWS::ECS::Cluster") {
        optional capacity_providers: Value = "CapacityProviders",
        optional cluster_name: Value = "ClusterName",
        optional cluster_settings: Vec<ClusterSettings> = "ClusterSettings",
        optional configuration: ClusterConfiguration = "Configuration",
        optional default_capacity_provider_strategy: Vec<ClusterCapacityProviderStrategyItem> =
            "DefaultCapacityProviderStrategy",
        optional tags: Vec<Tag> = "Tags",
    }
}

property_type! {
    pub struct ClusterSettings("AWS::ECS::Cluster.ClusterSettings") {
        optional name: Value = "Name",
        optional value: Value = "Value",
    }
}

property_type! {
    pub struct ClusterConfiguration("AWS::ECS::Cluster.ClusterConfiguration") {
        optional execute_command_configuration: ExecuteCommandConfiguration =
            "ExecuteCommandConfiguration",
    }
}

property_type! {
    pub struct ExecuteCommandConfiguration("AWS::ECS::Cluster.ExecuteCommandConfiguration") {
        optional kms_key_id: Value = "KmsKeyId",
        optional log_configuration: ExecuteCommandLogConfiguration = "LogConfiguration",
        /// `NONE`, `DEFAULT` or `OVERRIDE`.
        optional logging: Value = "Logging",
    }
}

property_type! {
    pub struct ExecuteCommandLogConfiguration("AWS::ECS::Cluster.ExecuteCommandLogConfiguration") {
        optional cloud_watch_encryption_enabled: Value = "CloudWatchEncryptionEnabled",
        optional cloud_watch_log_group_name: Value = "CloudWatchLogGroupName",
        optional s3_bucket_name: Value = "S3BucketName",
        optional s3_encryption_enabled: Value = "S3EncryptionEnabled",
        optional s3_key_prefix: Value = "S3KeyPrefix",
    }
}

property_type! {
    pub struct ClusterCapacityProviderStrategyItem("AWS::ECS::Cluster.CapacityProviderStrategyItem") {
        optional base: Value = "Base",
        optional capacity_provider: Value = "CapacityProvider",
        optional weight: Value = "Weight",
    }
}

resource_type! {
    /// A long-running ECS service. Every property is optional.
    #[derive(Default)]
    pub struct Service("AWS::ECS::Service") {
        optional capacity_provider_strategy: Vec<CapacityProviderStrategyItem> =
            "CapacityProviderStrategy",
        optional cluster: Value = "Cluster",
        optional deployment_configuration: DeploymentConfiguration = "DeploymentConfiguration",
        optional deployment_controller: DeploymentController = "DeploymentController",
        optional desired_count: Value = "DesiredCount",
        optional enable_ecs_managed_tags: Value = "EnableECSManagedTags",
        optional enable_execute_command: Value = "EnableExecuteCommand",
        optional health_check_grace_period_seconds: Value = "HealthCheckGracePeriodSeconds",
        optional launch_type: Value = "LaunchType",
        optional load_balancers: Vec<LoadBalancer> = "LoadBalancers",
        optional network_configuration: NetworkConfiguration = "NetworkConfiguration",
        optional placement_constraints: Vec<PlacementConstraint> = "PlacementConstraints",
        optional placement_strategies: Vec<PlacementStrategy> = "PlacementStrategies",
        optional platform_version: Value = "PlatformVersion",
        optional propagate_tags: Value = "PropagateTags",
        optional role: Value = "Role",
        optional scheduling_strategy: Value = "SchedulingStrategy",
        optional service_name: Value = "ServiceName",
        optional service_registries: Vec<ServiceRegistry> = "ServiceRegistries",
        optional tags: Vec<Tag> = "Tags",
        optional task_definition: Value = "TaskDefinition",
    }
}

property_type! {
    pub struct CapacityProviderStrategyItem("AWS::ECS::Service.CapacityProviderStrategyItem") {
        optional base: Value = "Base",
        optional capacity_provider: Value = "CapacityProvider",
        optional weight: Value = "Weight",
    }
}

property_type! {
    pub struct DeploymentConfiguration("AWS::ECS::Service.DeploymentConfiguration") {
        optional deployment_circuit_breaker: DeploymentCircuitBreaker = "DeploymentCircuitBreaker",
        optional maximum_percent: Value = "MaximumPercent",
        optional minimum_healthy_percent: Value = "MinimumHealthyPercent",
    }
}

property_type! {
    pub struct DeploymentCircuitBreaker("AWS::ECS::Service.DeploymentCircuitBreaker") {
        required enable: Value = "Enable",
        required rollback: Value = "Rollback",
    }
}

property_type! {
    /// Which deployment controller runs the service: `ECS`, `CODE_DEPLOY` or
    /// `EXTERNAL`.
    #[derive(Default)]
    pub struct DeploymentController("AWS::ECS::Service.DeploymentController") {
        optional r#type: Value = "Type",
    }
}

property_type! {
    pub struct LoadBalancer("AWS::ECS::Service.LoadBalancer") {
        optional container_name: Value = "ContainerName",
        optional container_port: Value = "ContainerPort",
        optional load_balancer_name: Value = "LoadBalancerName",
        optional target_group_arn: Value = "TargetGroupArn",
    }
}

property_type! {
    pub struct NetworkConfiguration("AWS::ECS::Service.NetworkConfiguration") {
        optional awsvpc_configuration: AwsVpcConfiguration = "AwsvpcConfiguration",
    }
}

property_type! {
    pub struct AwsVpcConfiguration("AWS::ECS::Service.AwsVpcConfiguration") {
        optional assign_public_ip: Value = "AssignPublicIp",
        optional security_groups: Value = "SecurityGroups",
        required subnets: Value = "Subnets",
    }
}

property_type! {
    pub struct PlacementConstraint("AWS::ECS::Service.PlacementConstraint") {
        optional expression: Value = "Expression",
        required r#type: Value = "Type",
    }
}

property_type! {
    pub struct PlacementStrategy("AWS::ECS::Service.PlacementStrategy") {
        optional field: Value = "Field",
        required r#type: Value = "Type",
    }
}

property_type! {
    pub struct ServiceRegistry("AWS::ECS::Service.ServiceRegistry") {
        optional container_name: Value = "ContainerName",
        optional container_port: Value = "ContainerPort",
        optional port: Value = "Port",
        optional registry_arn: Value = "RegistryArn",
    }
}
