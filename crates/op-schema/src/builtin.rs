//! Built-in connector types, used when the backend registry is unreachable.

use crate::descriptor::TypeDescriptor;
use crate::field::FieldSpec;
use crate::registry::SchemaRegistry;

/// Type identifiers of the built-in registry, in display order.
pub const BUILTIN_TYPE_IDS: [&str; 10] = [
    "sap",
    "salesforce",
    "database",
    "http",
    "kafka",
    "ftp",
    "email",
    "aws_s3",
    "azure_blob",
    "soap",
];

pub(crate) fn registry() -> SchemaRegistry {
    SchemaRegistry::from_descriptors(descriptors()).unwrap_or_default()
}

/// The built-in descriptors.
#[must_use]
pub fn descriptors() -> Vec<TypeDescriptor> {
    vec![
        TypeDescriptor::new("sap", "SAP", "Connect to SAP ERP, S/4HANA")
            .with_field(FieldSpec::string("host", "Host").required())
            .with_field(FieldSpec::string("username", "Username").required())
            .with_field(FieldSpec::password("password", "Password").required()),
        TypeDescriptor::new("salesforce", "Salesforce", "Connect to Salesforce CRM")
            .with_field(FieldSpec::string("instance_url", "Instance URL").required())
            .with_field(FieldSpec::string("client_id", "Client ID").required())
            .with_field(FieldSpec::password("client_secret", "Client Secret").required()),
        TypeDescriptor::new("database", "Database", "PostgreSQL, MySQL, Oracle")
            .with_field(
                FieldSpec::select("db_type", "Type", ["PostgreSQL", "MySQL", "Oracle"]).required(),
            )
            .with_field(FieldSpec::string("host", "Host").required())
            .with_field(FieldSpec::number("port", "Port").required())
            .with_field(FieldSpec::string("database", "Database").required())
            .with_field(FieldSpec::string("username", "Username").required())
            .with_field(FieldSpec::password("password", "Password").required()),
        TypeDescriptor::new("http", "HTTP/REST", "Connect to REST APIs")
            .with_field(FieldSpec::string("base_url", "Base URL").required())
            .with_field(FieldSpec::select(
                "auth_type",
                "Auth",
                ["None", "Basic", "Bearer", "API Key"],
            )),
        TypeDescriptor::new("kafka", "Apache Kafka", "Event streaming platform")
            .with_field(FieldSpec::string("bootstrap_servers", "Servers").required()),
        TypeDescriptor::new("ftp", "FTP/SFTP", "File transfer servers")
            .with_field(FieldSpec::string("host", "Host").required())
            .with_field(FieldSpec::string("username", "Username").required())
            .with_field(FieldSpec::password("password", "Password").required()),
        TypeDescriptor::new("email", "Email", "SMTP/IMAP servers")
            .with_field(FieldSpec::string("host", "Host").required())
            .with_field(FieldSpec::number("port", "Port").required())
            .with_field(FieldSpec::string("username", "Username").required())
            .with_field(FieldSpec::password("password", "Password").required()),
        TypeDescriptor::new("aws_s3", "AWS S3", "Amazon S3 storage")
            .with_field(FieldSpec::string("access_key_id", "Access Key").required())
            .with_field(FieldSpec::password("secret_access_key", "Secret Key").required())
            .with_field(FieldSpec::string("region", "Region")),
        TypeDescriptor::new("azure_blob", "Azure Blob", "Azure Blob Storage")
            .with_field(FieldSpec::password("connection_string", "Connection String").required()),
        TypeDescriptor::new("soap", "SOAP", "SOAP Web Services")
            .with_field(FieldSpec::string("wsdl_url", "WSDL URL").required()),
    ]
}
