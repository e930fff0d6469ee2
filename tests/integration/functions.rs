//! Template functions inside real fragments

use crate::common::{assert_file_content, find, render};
use anyhow::Result;
use mcrender::test_utils::{ControllerConfigFixture, TemplateTree};

const VIPS: &str = r#"path: /etc/keepalived/vips
contents:
  inline: |
    platform={{ onPremPlatformShortName() }}
    api={{ onPremPlatformAPIServerInternalIP() }}
    ingress={{ onPremPlatformIngressIP() }}
    {% for ip in onPremPlatformAPIServerInternalIPs() %}vip={{ ip }}
    {% endfor %}managed={{ isOpenShiftManagedDefaultLB() }}
"#;

#[test]
fn test_on_prem_functions() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.file("master/00-master/on-prem/files/vips.yaml", VIPS)?;

    let configs = render(&tree, &ControllerConfigFixture::baremetal_with_vips())?;
    assert_file_content(
        find(&configs, "master", "00-master"),
        "/etc/keepalived/vips",
        "platform=kni\napi=192.168.111.5\ningress=192.168.111.4\n\
         vip=192.168.111.5\nvip=fd2e:6f44:5dd8::5\nmanaged=true\n",
    );
    Ok(())
}

#[test]
fn test_on_prem_function_fails_on_cloud() -> Result<()> {
    // The same fragment in the base tier is evaluated on AWS too
    let tree = TemplateTree::new()?;
    tree.file("master/00-master/_base/files/vips.yaml", VIPS)?;

    let err = render(&tree, &ControllerConfigFixture::platform("AWS")).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("master/00-master/_base/files/vips.yaml"), "{message}");
    assert!(message.contains("onPremPlatformAPIServerInternalIP"), "{message}");
    Ok(())
}

#[test]
fn test_url_and_cloud_functions() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.file(
        "worker/00-worker/_base/files/kubelet-env.yaml",
        r#"path: /etc/kubernetes/kubelet-env
contents:
  inline: |
    host={{ urlHost(u=infra.status.apiServerInternalURI) }}
    port={{ urlPort(u=infra.status.apiServerInternalURI) }}
    http={{ urlPort(u="http://h") }}
    provider={{ cloudProvider() }}
    node={{ skip(key="node_ip") }}
    dns={{ clusterDNSIP }}
"#,
    )?;

    let configs = render(&tree, &ControllerConfigFixture::platform("AWS"))?;
    assert_file_content(
        find(&configs, "worker", "00-worker"),
        "/etc/kubernetes/kubelet-env",
        "host=api-int.example.com\nport=6443\nhttp=80\nprovider=aws\nnode={{.node_ip}}\n\
         dns=172.30.0.10\n",
    );
    Ok(())
}

#[test]
fn test_invalid_function_arguments_fail() -> Result<()> {
    for body in [r#"{{ urlPort(u="ftp://h") }}"#, r#"{{ skip(key="Foo") }}"#] {
        let tree = TemplateTree::new()?;
        tree.file("worker/00-worker/_base/files/bad.yaml", body)?;

        let err = render(&tree, &ControllerConfigFixture::platform("AWS")).unwrap_err();
        assert!(format!("{err:#}").contains("bad.yaml"), "{err:#}");
    }
    Ok(())
}
