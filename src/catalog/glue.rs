//! `AWS::Glue::MLTransform` schema.

use crate::properties::Json;
use crate::value::Value;
use crate::{property_type, resource_type};

resource_type! {
    /// A machine learning transform that finds matching records.
    pub struct MLTransform("AWS::Glue::MLTransform") {
        optional description: Value = "Description",
        optional glue_version: Value = "GlueVersion",
        required input_record_tables: InputRecordTables = "InputRecordTables",
        optional max_capacity: Value = "MaxCapacity",
        optional max_retries: Value = "MaxRetries",
        optional name: Value = "Name",
        optional number_of_workers: Value = "NumberOfWorkers",
        required role: Value = "Role",
        /// Free-form JSON object of tags.
        optional tags: Json = "Tags",
        optional timeout: Value = "Timeout",
        optional transform_encryption: TransformEncryption = "TransformEncryption",
        required transform_parameters: TransformParameters = "TransformParameters",
        optional worker_type: Value = "WorkerType",
    }
}

property_type! {
    #[derive(Default)]
    pub struct InputRecordTables("AWS::Glue::MLTransform.InputRecordTables") {
        optional glue_tables: Vec<GlueTables> = "GlueTables",
    }
}

property_type! {
    pub struct GlueTables("AWS::Glue::MLTransform.GlueTables") {
        optional catalog_id: Value = "CatalogId",
        optional connection_name: Value = "ConnectionName",
        required database_name: Value = "DatabaseName",
        required table_name: Value = "TableName",
    }
}

property_type! {
    pub struct TransformEncryption("AWS::Glue::MLTransform.TransformEncryption") {
        optional ml_user_data_encryption: MLUserDataEncryption = "MLUserDataEncryption",
        optional task_run_security_configuration_name: Value = "TaskRunSecurityConfigurationName",
    }
}

property_type! {
    pub struct MLUserDataEncryption("AWS::Glue::MLTransform.MLUserDataEncryption") {
        optional kms_key_id: Value = "KmsKeyId",
        required ml_user_data_encryption_mode: Value = "MLUserDataEncryptionMode",
    }
}

property_type! {
    pub struct TransformParameters("AWS::Glue::MLTransform.TransformParameters") {
        optional find_matches_parameters: FindMatchesParameters = "FindMatchesParameters",
        /// Only `FIND_MATCHES` exists today.
        required transform_type: Value = "TransformType",
    }
}

property_type! {
    pub struct FindMatchesParameters("AWS::Glue::MLTransform.FindMatchesParameters") {
        optional accuracy_cost_tradeoff: Value = "AccuracyCostTradeoff",
        optional enforce_provided_labels: Value = "EnforceProvidedLabels",
        optional precision_recall_tradeoff: Value = "PrecisionRecallTradeoff",
        required primary_key_column_name: Value = "PrimaryKeyColumnName",
    }
}
