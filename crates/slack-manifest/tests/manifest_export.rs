//! End-to-end manifest export tests

use serde_json::json;
use slack_manifest::{
    define_datastore, define_function, define_oauth2_provider, define_type, define_workflow,
    manifest, schema, AppHomeDefinition, CustomType, CustomTypeSpec, DatastoreDefinition,
    EventSubscriptions, FeaturesDefinition, FunctionDefinition, FunctionRuntime,
    ManifestDefinition, ManifestError, ManifestSettings, OAuth2ProviderDefinition,
    ParameterDefinition, ParameterSet, SlackManifest, SlashCommand, StepManifest, WorkflowSpec,
};
use std::sync::Arc;

fn f1() -> Arc<FunctionDefinition> {
    define_function(FunctionDefinition {
        callback_id: "f1".to_string(),
        title: "Function one".to_string(),
        source_file: "functions/f1.ts".to_string(),
        input_parameters: Some(
            ParameterSet::new()
                .with_required_property("in", ParameterDefinition::new(schema::types::STRING)),
        ),
        output_parameters: Some(
            ParameterSet::new()
                .with_required_property("out", ParameterDefinition::new(schema::types::STRING)),
        ),
        ..Default::default()
    })
}

#[test]
fn test_function_and_workflow_end_to_end() -> Result<(), ManifestError> {
    let function = f1();

    let mut workflow = define_workflow(WorkflowSpec {
        callback_id: "wf1".to_string(),
        title: "Workflow one".to_string(),
        input_parameters: Some(
            ParameterSet::new()
                .with_property("someInput", ParameterDefinition::new(schema::types::STRING)),
        ),
        ..Default::default()
    });
    let some_input = workflow.inputs().get("someInput");
    workflow.add_step("f1", json!({ "in": some_input }))?;

    let definition = ManifestDefinition {
        name: "Example".to_string(),
        description: Some("An example app".to_string()),
        icon: Some("assets/icon.png".to_string()),
        bot_scopes: vec!["commands".to_string()],
        ..Default::default()
    }
    .with_function(Arc::clone(&function))
    .with_workflow(workflow);

    let exported = manifest(definition)?;

    assert_eq!(exported.functions["f1"], function.export());
    assert_eq!(
        exported.workflows["wf1"].steps[0],
        StepManifest {
            id: "0".to_string(),
            function_id: "#/functions/f1".to_string(),
            inputs: json!({ "in": "{{inputs.someInput}}" }),
        }
    );
    Ok(())
}

#[test]
fn test_typed_step_registers_local_function_only() -> Result<(), ManifestError> {
    let local = f1();
    let builtin = define_function(FunctionDefinition {
        callback_id: "slack#/functions/send_message".to_string(),
        title: "Send a message".to_string(),
        ..Default::default()
    });

    let mut workflow = define_workflow(WorkflowSpec {
        callback_id: "wf".to_string(),
        title: "Workflow".to_string(),
        ..Default::default()
    });
    let first = workflow.add_step(&local, json!({ "in": "hello" }))?;
    let out = first.outputs().get("out");
    workflow.add_step(&builtin, json!({ "message": out }))?;

    let exported = manifest(ManifestDefinition::default().with_workflow(workflow))?;

    assert_eq!(exported.functions.keys().collect::<Vec<_>>(), ["f1"]);
    let steps = &exported.workflows["wf"].steps;
    assert_eq!(steps[1].function_id, "slack#/functions/send_message");
    assert_eq!(steps[1].inputs, json!({ "message": "{{steps.0.out}}" }));
    Ok(())
}

#[test]
fn test_function_runtime_follows_hosting() -> Result<(), ManifestError> {
    let hosted = manifest(ManifestDefinition {
        slack_hosted: true,
        ..Default::default()
    })?;
    assert_eq!(hosted.settings.function_runtime, Some(FunctionRuntime::Slack));

    let remote = manifest(ManifestDefinition::default())?;
    assert_eq!(remote.settings.function_runtime, Some(FunctionRuntime::Remote));

    let value = serde_json::to_value(&hosted)?;
    assert_eq!(value["settings"]["function_runtime"], json!("slack"));
    Ok(())
}

#[test]
fn test_display_features_and_settings() -> Result<(), ManifestError> {
    let definition = ManifestDefinition {
        name: "Triage".to_string(),
        description: Some("Routes incidents".to_string()),
        background_color: Some("#000000".to_string()),
        long_description: Some("Routes incidents to responders".to_string()),
        user_scopes: Some(vec!["search:read".to_string()]),
        redirect_urls: Some(vec!["https://example.com/oauth".to_string()]),
        token_management_enabled: Some(true),
        features: Some(FeaturesDefinition {
            app_home: Some(AppHomeDefinition {
                messages_tab_enabled: Some(false),
                ..Default::default()
            }),
            slash_commands: Some(vec![SlashCommand {
                command: "/triage".to_string(),
                description: "Open triage".to_string(),
                url: None,
                usage_hint: None,
                should_escape: None,
            }]),
            unfurl_domains: Some(vec!["example.com".to_string()]),
            ..Default::default()
        }),
        settings: Some(ManifestSettings {
            org_deploy_enabled: Some(true),
            socket_mode_enabled: Some(true),
            ..Default::default()
        }),
        token_rotation_enabled: Some(false),
        event_subscriptions: Some(EventSubscriptions {
            bot_events: Some(vec!["app_mention".to_string()]),
            ..Default::default()
        }),
        ..Default::default()
    };

    let value = serde_json::to_value(manifest(definition)?)?;

    assert_eq!(
        value["display_information"],
        json!({
            "name": "Triage",
            "description": "Routes incidents",
            "background_color": "#000000",
            "long_description": "Routes incidents to responders"
        })
    );
    assert_eq!(value["features"]["bot_user"], json!({ "display_name": "Triage" }));
    assert_eq!(
        value["features"]["app_home"],
        json!({ "messages_tab_enabled": false, "messages_tab_read_only_enabled": true })
    );
    assert_eq!(value["features"]["slash_commands"][0]["command"], json!("/triage"));
    assert_eq!(value["features"]["unfurl_domains"], json!(["example.com"]));

    assert_eq!(value["oauth_config"]["scopes"]["user"], json!(["search:read"]));
    assert_eq!(
        value["oauth_config"]["redirect_urls"],
        json!(["https://example.com/oauth"])
    );
    assert_eq!(value["oauth_config"]["token_management_enabled"], json!(true));

    let settings = &value["settings"];
    assert_eq!(settings["org_deploy_enabled"], json!(true));
    // Absent at the root, so the caller's value is cleared
    assert!(settings.get("socket_mode_enabled").is_none());
    assert_eq!(settings["token_rotation_enabled"], json!(false));
    assert_eq!(settings["event_subscriptions"]["bot_events"], json!(["app_mention"]));
    assert_eq!(settings["function_runtime"], json!("remote"));
    Ok(())
}

#[test]
fn test_display_name_override() -> Result<(), ManifestError> {
    let exported = manifest(ManifestDefinition {
        name: "Triage".to_string(),
        display_name: Some("triage-bot".to_string()),
        ..Default::default()
    })?;
    assert_eq!(exported.features.bot_user.display_name, "triage-bot");
    assert!(exported.features.app_home.messages_tab_enabled);
    assert!(exported.features.app_home.messages_tab_read_only_enabled);
    Ok(())
}

#[test]
fn test_datastores_types_and_providers() -> Result<(), ManifestError> {
    let priority = define_type(CustomTypeSpec {
        callback_id: Some("priority".to_string()),
        definition: ParameterDefinition::new(schema::types::INTEGER)
            .with_title("Priority")
            .with_extra("callback_id", json!("priority")),
        ..Default::default()
    })?;
    let store = define_datastore(DatastoreDefinition {
        name: "incidents".to_string(),
        primary_key: "id".to_string(),
        attributes: [
            ("id".to_string(), ParameterDefinition::new(schema::types::STRING)),
            ("priority".to_string(), ParameterDefinition::new(&priority)),
        ]
        .into_iter()
        .collect(),
        ..Default::default()
    });
    let provider = define_oauth2_provider(OAuth2ProviderDefinition {
        provider_key: "github".to_string(),
        options: json!({ "client_id": "abc", "scope": ["repo"] }),
        ..Default::default()
    });

    let definition = ManifestDefinition::default()
        .with_datastore(Arc::clone(&store))
        .with_datastore(store)
        .with_oauth2_provider(provider);
    let value = serde_json::to_value(manifest(definition)?)?;

    assert_eq!(
        value["datastores"]["incidents"]["attributes"]["priority"],
        json!({ "type": "#/types/priority" })
    );
    assert_eq!(value["datastores"].as_object().map(|d| d.len()), Some(1));
    assert_eq!(
        value["types"]["priority"],
        json!({ "type": "integer", "title": "Priority" })
    );
    assert_eq!(
        value["external_auth_providers"]["oauth2"]["github"]["provider_type"],
        json!("CUSTOM")
    );
    assert_eq!(
        value["oauth_config"]["scopes"]["bot"],
        json!(["datastore:read", "datastore:write"])
    );
    Ok(())
}

#[test]
fn test_colliding_identities_are_not_validated() -> Result<(), ManifestError> {
    // A function and a type may share an id; each lands in its own map
    let shared = define_type(CustomTypeSpec {
        name: Some("f1".to_string()),
        definition: ParameterDefinition::new(schema::types::STRING),
        ..Default::default()
    })?;
    let exported = manifest(
        ManifestDefinition::default()
            .with_function(f1())
            .with_type(shared),
    )?;

    assert!(exported.functions.contains_key("f1"));
    assert!(exported.types.contains_key("f1"));
    Ok(())
}

#[test]
fn test_assembler_exposes_discovered_entries() -> Result<(), ManifestError> {
    let leaf = CustomType::named("leaf");
    leaf.define(ParameterDefinition::new(schema::types::STRING))?;

    let function = define_function(FunctionDefinition {
        callback_id: "uses_leaf".to_string(),
        input_parameters: Some(
            ParameterSet::new().with_property("leaf", ParameterDefinition::new(&leaf)),
        ),
        ..Default::default()
    });

    let definition = ManifestDefinition::default().with_function(function);
    let mut assembler = SlackManifest::new(definition);
    assembler.export()?;

    // Discovery never grows the caller's definition
    assert!(assembler.definition().types.is_empty());
    assert_eq!(assembler.types().len(), 1);
    assert_eq!(assembler.functions().len(), 1);
    Ok(())
}

#[test]
fn test_undefined_type_fails_export() {
    let pending = CustomType::named("pending");
    let result = manifest(ManifestDefinition::default().with_type(pending));
    assert!(matches!(result, Err(ManifestError::UndefinedType(id)) if id == "pending"));
}

#[test]
fn test_workflow_only_root_pulls_in_functions_and_types() -> Result<(), ManifestError> {
    let severity = define_type(CustomTypeSpec {
        name: Some("severity".to_string()),
        definition: ParameterDefinition::new(schema::types::INTEGER),
        ..Default::default()
    })?;
    let incident = define_type(CustomTypeSpec {
        name: Some("incident".to_string()),
        definition: ParameterDefinition::object()
            .with_property("summary", ParameterDefinition::new(schema::types::STRING))
            .with_property("severity", ParameterDefinition::new(&severity)),
        ..Default::default()
    })?;
    let receipt = define_type(CustomTypeSpec {
        name: Some("receipt".to_string()),
        definition: ParameterDefinition::new(schema::types::STRING),
        ..Default::default()
    })?;
    let ticket = define_type(CustomTypeSpec {
        name: Some("ticket".to_string()),
        definition: ParameterDefinition::object()
            .with_property("id", ParameterDefinition::new(schema::types::STRING)),
        ..Default::default()
    })?;

    let open_ticket = define_function(FunctionDefinition {
        callback_id: "open_ticket".to_string(),
        title: "Open ticket".to_string(),
        source_file: "functions/open_ticket.ts".to_string(),
        input_parameters: Some(
            ParameterSet::new()
                .with_required_property("incident", ParameterDefinition::new(&incident)),
        ),
        output_parameters: Some(
            ParameterSet::new().with_property("ticket", ParameterDefinition::new(&ticket)),
        ),
        ..Default::default()
    });

    let mut workflow = define_workflow(WorkflowSpec {
        callback_id: "triage".to_string(),
        title: "Triage".to_string(),
        input_parameters: Some(
            ParameterSet::new().with_property("incident", ParameterDefinition::new(&incident)),
        ),
        output_parameters: Some(
            ParameterSet::new().with_property("receipt", ParameterDefinition::new(&receipt)),
        ),
        ..Default::default()
    });

    // Properties of a custom object type stay reachable through the reference
    let summary = workflow.inputs().path("incident.summary");
    assert!(summary
        .as_ref()
        .is_some_and(|v| v.to_string() == "{{inputs.incident.summary}}"));
    assert!(workflow.inputs().path("incident.unknown").is_none());

    let incident_input = workflow.inputs().get("incident");
    let step = workflow.add_step(&open_ticket, json!({ "incident": incident_input }))?;
    assert!(step
        .outputs()
        .path("ticket.id")
        .is_some_and(|v| v.to_string() == "{{steps.0.ticket.id}}"));

    let exported = manifest(ManifestDefinition::default().with_workflow(workflow))?;

    assert_eq!(exported.functions.keys().collect::<Vec<_>>(), ["open_ticket"]);
    assert_eq!(
        exported.types.keys().collect::<Vec<_>>(),
        ["incident", "severity", "ticket", "receipt"]
    );
    assert_eq!(
        exported.workflows["triage"].steps[0].inputs,
        json!({ "incident": "{{inputs.incident}}" })
    );
    Ok(())
}
