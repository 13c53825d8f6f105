//! Testing utilities for the apiseq workspace
//!
//! Fixture documents and model builders shared by the crates' tests and
//! benches.

#![allow(missing_docs)]
#![allow(clippy::missing_panics_doc)]

use apiseq_model::{DocumentParser, SpecModel, YamlParser};
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};

/// `#/components/schemas/{name}`
pub fn schema_ref(name: &str) -> Value {
    json!({ "$ref": format!("#/components/schemas/{name}") })
}

/// Array of `#/components/schemas/{name}`
pub fn list_ref(name: &str) -> Value {
    json!({ "type": "array", "items": schema_ref(name) })
}

/// `content` map with one JSON media type
pub fn json_content(schema: Value) -> Value {
    json!({ "application/json": { "schema": schema } })
}

/// Path parameter
pub fn path_param(name: &str, schema_type: &str) -> Value {
    json!({ "name": name, "in": "path", "required": true, "schema": { "type": schema_type } })
}

/// Query parameter
pub fn query_param(name: &str, schema_type: &str) -> Value {
    json!({ "name": name, "in": "query", "schema": { "type": schema_type } })
}

/// Minimal 3.0 document around `schemas` and `paths`
pub fn document(schemas: Value, paths: Value) -> Value {
    json!({
        "openapi": "3.0.3",
        "info": { "title": "Fixture API", "version": "1.0.0" },
        "paths": paths,
        "components": { "schemas": schemas }
    })
}

pub fn model(schemas: Value, paths: Value) -> SpecModel {
    SpecModel::from_value(document(schemas, paths)).unwrap()
}

/// `User` with a create and a delete endpoint
pub fn scenario_users() -> SpecModel {
    model(
        json!({ "User": {} }),
        json!({
            "/users": {
                "post": {
                    "requestBody": { "content": json_content(schema_ref("User")) },
                    "responses": { "201": { "content": json_content(schema_ref("User")) } }
                }
            },
            "/users/{userId}": {
                "delete": {
                    "parameters": [path_param("userId", "string")],
                    "responses": { "204": { "description": "deleted" } }
                }
            }
        }),
    )
}

/// `Order.customer` references `Customer`, which has no create endpoint
pub fn scenario_orders() -> SpecModel {
    model(
        json!({
            "Order": {
                "type": "object",
                "properties": {
                    "id": { "type": "string" },
                    "customer": schema_ref("Customer")
                }
            },
            "Customer": {
                "type": "object",
                "properties": { "name": { "type": "string" } }
            }
        }),
        json!({
            "/orders": {
                "post": {
                    "requestBody": { "content": json_content(schema_ref("Order")) },
                    "responses": { "201": { "content": json_content(schema_ref("Order")) } }
                }
            },
            "/orders/{orderId}": {
                "get": {
                    "parameters": [path_param("orderId", "string")],
                    "responses": { "200": { "content": json_content(schema_ref("Order")) } }
                },
                "delete": {
                    "parameters": [path_param("orderId", "string")]
                }
            }
        }),
    )
}

/// Owner and Pet reference each other; `POST /pets` sends a Pet and returns its Owner
pub fn scenario_mutual() -> SpecModel {
    model(
        json!({
            "Owner": { "type": "object", "properties": { "pet": schema_ref("Pet") } },
            "Pet": { "type": "object", "properties": { "owner": schema_ref("Owner") } }
        }),
        json!({
            "/pets": {
                "post": {
                    "requestBody": { "content": json_content(schema_ref("Pet")) },
                    "responses": { "201": { "content": json_content(schema_ref("Owner")) } }
                }
            }
        }),
    )
}

/// Two schemas that no endpoint mentions
pub fn scenario_unreferenced() -> SpecModel {
    model(
        json!({
            "Alpha": { "properties": { "name": { "type": "string" } } },
            "Beta": { "properties": { "size": { "type": "integer" } } }
        }),
        json!({
            "/health": { "get": { "responses": { "200": { "description": "ok" } } } },
            "/metrics": { "post": { "responses": { "202": { "description": "accepted" } } } }
        }),
    )
}

/// `orderId` path parameter with no matching property
pub fn scenario_order_id() -> SpecModel {
    model(
        json!({
            "Order": { "properties": { "total": { "type": "number" } } }
        }),
        json!({
            "/orders/{orderId}": {
                "get": {
                    "parameters": [path_param("orderId", "string")],
                    "responses": { "200": { "content": json_content(schema_ref("Order")) } }
                }
            }
        }),
    )
}

/// `S0 -> S1 -> ... -> S{n-1}` through `next` properties, one create and
/// one delete endpoint per schema
pub fn chain(n: usize) -> SpecModel {
    let mut schemas = Map::new();
    let mut paths = Map::new();
    for i in 0..n {
        let name = format!("S{i}");
        let mut properties = Map::new();
        if i + 1 < n {
            properties.insert("next".to_string(), schema_ref(&format!("S{}", i + 1)));
        }
        schemas.insert(name.clone(), json!({ "properties": properties }));
        paths.insert(
            format!("/s{i}"),
            json!({ "post": { "requestBody": { "content": json_content(schema_ref(&name)) } } }),
        );
        paths.insert(
            format!("/s{i}/{{s{i}Id}}"),
            json!({ "delete": { "parameters": [path_param(&format!("s{i}Id"), "string")] } }),
        );
    }
    model(Value::Object(schemas), Value::Object(paths))
}

/// `Root` with `n` independent leaf properties and one create endpoint
///
/// The create endpoint connects `n + 1` objects whose only constraints put
/// each leaf before `Root`, so there are `n!` valid orderings.
pub fn star(n: usize) -> SpecModel {
    let mut schemas = Map::new();
    let mut properties = Map::new();
    for i in 0..n {
        let leaf = format!("Leaf{i}");
        properties.insert(format!("leaf{i}"), schema_ref(&leaf));
        schemas.insert(leaf, json!({}));
    }
    schemas.insert("Root".to_string(), json!({ "properties": properties }));
    model(
        Value::Object(schemas),
        json!({
            "/roots": { "post": { "requestBody": { "content": json_content(schema_ref("Root")) } } }
        }),
    )
}

/// Operation keys used by [`shaped`]
pub const SHAPE_OPERATIONS: [&str; 5] = ["get", "post", "put", "patch", "delete"];

/// Document with `objects` schemas `O0..`, the given property references
/// `(owner, target, is_list)` and endpoints `(object, operation)`
///
/// Indexes wrap modulo their range, so any generated numbers form a valid
/// shape. `post`/`put`/`patch` send the object, `get` returns it and
/// `delete` addresses it by `{o{i}Id}`.
pub fn shaped(
    objects: usize,
    properties: &[(usize, usize, bool)],
    endpoints: &[(usize, usize)],
) -> Value {
    let objects = objects.max(1);
    let name = |i: usize| format!("O{}", i % objects);

    let mut schemas = Map::new();
    for i in 0..objects {
        schemas.insert(name(i), json!({ "type": "object", "properties": {} }));
    }
    for (p, &(owner, target, is_list)) in properties.iter().enumerate() {
        let reference = if is_list {
            list_ref(&name(target))
        } else {
            schema_ref(&name(target))
        };
        if let Some(props) = schemas
            .get_mut(&name(owner))
            .and_then(|schema| schema.get_mut("properties"))
            .and_then(Value::as_object_mut)
        {
            props.insert(format!("p{p}"), reference);
        }
    }

    let mut paths = Map::new();
    for &(object, operation) in endpoints {
        let object = object % objects;
        let operation = SHAPE_OPERATIONS[operation % SHAPE_OPERATIONS.len()];
        let (path, details) = match operation {
            "get" => (
                format!("/o{object}"),
                json!({ "responses": { "200": { "content": json_content(schema_ref(&name(object))) } } }),
            ),
            "delete" => (
                format!("/o{object}/{{o{object}Id}}"),
                json!({ "parameters": [path_param(&format!("o{object}Id"), "string")] }),
            ),
            _ => (
                format!("/o{object}"),
                json!({ "requestBody": { "content": json_content(schema_ref(&name(object))) } }),
            ),
        };
        let item = paths.entry(path).or_insert_with(|| json!({}));
        if let Some(item) = item.as_object_mut() {
            item.insert(operation.to_string(), details);
        }
    }

    document(Value::Object(schemas), Value::Object(paths))
}

/// Pet store flavoured document in YAML, with integer status keys
pub const PETSTORE_YAML: &str = r##"openapi: 3.0.2
info:
  title: Swagger Petstore
  version: 1.0.5
paths:
  /pet:
    post:
      requestBody:
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/Pet'
          application/xml:
            schema:
              $ref: '#/components/schemas/Pet'
      responses:
        200:
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Pet'
    put:
      requestBody:
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/Pet'
      responses:
        200:
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Pet'
  /pet/findByStatus:
    get:
      parameters:
        - name: status
          in: query
          schema:
            type: string
      responses:
        200:
          content:
            application/json:
              schema:
                type: array
                items:
                  $ref: '#/components/schemas/Pet'
  /pet/{petId}:
    parameters:
      - name: petId
        in: path
        required: true
        schema:
          type: integer
    get:
      responses:
        200:
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Pet'
    delete:
      parameters:
        - name: api_key
          in: header
          schema:
            type: string
      responses:
        400:
          description: Invalid pet value
  /store/inventory:
    get:
      responses:
        200:
          content:
            application/json:
              schema:
                type: object
  /store/order:
    post:
      requestBody:
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/Order'
      responses:
        200:
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Order'
  /store/order/{orderId}:
    get:
      parameters:
        - name: orderId
          in: path
          required: true
          schema:
            type: integer
      responses:
        200:
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Order'
    delete:
      parameters:
        - name: orderId
          in: path
          required: true
          schema:
            type: integer
      responses:
        404:
          description: Order not found
  /user:
    post:
      requestBody:
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/User'
      responses:
        default:
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/User'
  /user/{username}:
    get:
      parameters:
        - name: username
          in: path
          required: true
          schema:
            type: string
      responses:
        200:
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/User'
    put:
      parameters:
        - name: username
          in: path
          required: true
          schema:
            type: string
      requestBody:
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/User'
      responses:
        default:
          description: successful operation
    delete:
      parameters:
        - name: username
          in: path
          required: true
          schema:
            type: string
      responses:
        404:
          description: User not found
components:
  schemas:
    Order:
      type: object
      properties:
        id:
          type: integer
        petId:
          type: integer
        quantity:
          type: integer
        status:
          type: string
    Category:
      type: object
      properties:
        id:
          type: integer
        name:
          type: string
    User:
      type: object
      properties:
        id:
          type: integer
        username:
          type: string
        email:
          type: string
    Tag:
      type: object
      properties:
        id:
          type: integer
        name:
          type: string
    Pet:
      type: object
      properties:
        id:
          type: integer
        name:
          type: string
        category:
          $ref: '#/components/schemas/Category'
        tags:
          type: array
          items:
            $ref: '#/components/schemas/Tag'
        status:
          type: string
"##;

pub fn petstore() -> SpecModel {
    let value = YamlParser.parse(PETSTORE_YAML).unwrap();
    SpecModel::from_value(value).unwrap()
}

/// Write `contents` to `dir/name` and return the path
pub fn write_fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}
