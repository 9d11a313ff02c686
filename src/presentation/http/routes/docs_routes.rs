use axum::{Json, Router, response::Html, routing::get};
use serde_json::{Value, json};

const SWAGGER_UI: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Document Q&amp;A API - Swagger UI</title>
  <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({ url: "/openapi.json", dom_id: "#swagger-ui" });
  </script>
</body>
</html>
"##;

pub fn docs_routes() -> Router {
    Router::new()
        .route("/docs", get(|| async { Html(SWAGGER_UI) }))
        .route("/openapi.json", get(|| async { Json(openapi_document()) }))
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Error"}}}
    })
}

fn json_response(description: &str, schema: &str) -> Value {
    json!({
        "description": description,
        "content": {"application/json": {"schema": {"$ref": format!("#/components/schemas/{}", schema)}}}
    })
}

pub fn openapi_document() -> Value {
    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Document Q&A API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Upload PDFs, images and text files, then ask questions answered from their content."
        },
        "paths": {
            "/ask": {
                "post": {
                    "summary": "Answer a question from the indexed documents",
                    "requestBody": {
                        "required": true,
                        "content": {"application/json": {"schema": {"$ref": "#/components/schemas/AskRequest"}}}
                    },
                    "responses": {
                        "200": json_response("Answer with its sources", "AskResponse"),
                        "400": error_response("Empty query"),
                        "500": error_response("Retrieval failed")
                    }
                }
            },
            "/upload/batch": {
                "post": {
                    "summary": "Queue documents for background processing",
                    "requestBody": {
                        "required": true,
                        "content": {"multipart/form-data": {"schema": {
                            "type": "object",
                            "properties": {"files": {"type": "array", "items": {"type": "string", "format": "binary"}}},
                            "required": ["files"]
                        }}}
                    },
                    "responses": {
                        "200": json_response("Per-file queue results", "UploadBatchResponse"),
                        "422": error_response("No files provided")
                    }
                }
            },
            "/jobs": {
                "get": {
                    "summary": "Recent processing jobs, newest first",
                    "parameters": [{"name": "limit", "in": "query", "schema": {"type": "integer", "minimum": 1, "maximum": 500}}],
                    "responses": {"200": json_response("Jobs", "JobList")}
                }
            },
            "/jobs/active": {
                "get": {
                    "summary": "Queued and running jobs",
                    "responses": {"200": json_response("Jobs", "JobList")}
                }
            },
            "/jobs/{job_id}": {
                "get": {
                    "summary": "Status of one job",
                    "parameters": [{"name": "job_id", "in": "path", "required": true, "schema": {"type": "string", "format": "uuid"}}],
                    "responses": {
                        "200": json_response("Job status", "JobStatus"),
                        "404": error_response("Unknown job")
                    }
                }
            },
            "/documents": {
                "get": {
                    "summary": "Indexed documents",
                    "responses": {"200": json_response("Documents", "DocumentList")}
                }
            },
            "/documents/{document_id}": {
                "delete": {
                    "summary": "Remove a document from the index",
                    "parameters": [{"name": "document_id", "in": "path", "required": true, "schema": {"type": "string"}}],
                    "responses": {
                        "200": json_response("Removed chunk count", "DeleteDocumentResponse"),
                        "404": error_response("Unknown document")
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Service health",
                    "responses": {"200": json_response("Health", "Health")}
                }
            },
            "/health/dependencies": {
                "get": {
                    "summary": "Embedding service, language model and queue probes",
                    "responses": {
                        "200": {"description": "All dependencies healthy"},
                        "503": {"description": "At least one dependency failed"}
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Error": {
                    "type": "object",
                    "properties": {"detail": {"type": "string"}}
                },
                "AskRequest": {
                    "type": "object",
                    "properties": {"query": {"type": "string"}},
                    "required": ["query"]
                },
                "Source": {
                    "type": "object",
                    "properties": {
                        "text": {"type": "string"},
                        "distance": {"type": "number"},
                        "metadata": {
                            "type": "object",
                            "properties": {
                                "filename": {"type": "string"},
                                "file_type": {"type": "string", "enum": ["pdf", "image", "text", "excel"]},
                                "chunk_index": {"type": "integer"}
                            }
                        }
                    }
                },
                "AskResponse": {
                    "type": "object",
                    "properties": {
                        "answer": {"type": "string"},
                        "sources": {"type": "array", "items": {"$ref": "#/components/schemas/Source"}}
                    }
                },
                "UploadBatchResponse": {
                    "type": "object",
                    "properties": {
                        "message": {"type": "string"},
                        "results": {"type": "array", "items": {
                            "type": "object",
                            "properties": {
                                "filename": {"type": "string"},
                                "status": {"type": "string"},
                                "job_id": {"type": "string", "format": "uuid"},
                                "error": {"type": "string"}
                            }
                        }}
                    }
                },
                "JobStatus": {
                    "type": "object",
                    "properties": {
                        "job_id": {"type": "string", "format": "uuid"},
                        "filename": {"type": "string"},
                        "status": {"type": "string", "enum": ["queued", "processing", "completed", "failed"]},
                        "progress": {"type": "number"},
                        "stage": {"type": "string", "nullable": true},
                        "created_at": {"type": "string", "format": "date-time"},
                        "started_at": {"type": "string", "format": "date-time", "nullable": true},
                        "completed_at": {"type": "string", "format": "date-time", "nullable": true},
                        "duration_ms": {"type": "integer", "nullable": true},
                        "error": {"type": "string", "nullable": true},
                        "result": {"type": "object", "nullable": true}
                    }
                },
                "JobList": {
                    "type": "object",
                    "properties": {
                        "jobs": {"type": "array", "items": {"$ref": "#/components/schemas/JobStatus"}},
                        "total": {"type": "integer"}
                    }
                },
                "DocumentList": {
                    "type": "object",
                    "properties": {
                        "documents": {"type": "array", "items": {
                            "type": "object",
                            "properties": {
                                "document_id": {"type": "string"},
                                "filename": {"type": "string"},
                                "file_type": {"type": "string"},
                                "chunk_count": {"type": "integer"}
                            }
                        }},
                        "total": {"type": "integer"}
                    }
                },
                "DeleteDocumentResponse": {
                    "type": "object",
                    "properties": {
                        "document_id": {"type": "string"},
                        "chunks_deleted": {"type": "integer"}
                    }
                },
                "Health": {
                    "type": "object",
                    "properties": {
                        "status": {"type": "string"},
                        "version": {"type": "string"},
                        "documents_indexed": {"type": "integer"}
                    }
                }
            }
        }
    })
}
