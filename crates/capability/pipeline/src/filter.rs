use domain::{Points, UpMessage, UpMessageType};
use mapping_contract::{Filter, FilterPoints};

/// 按消息类型过滤；不保留时返回 `None`。
pub fn filter(message: &UpMessage, operation: &Filter) -> Option<UpMessage> {
    let keep = match message.message_type {
        UpMessageType::DeviceDownlinkSent => operation.keep_device_downlink_sent,
        UpMessageType::DeviceUplink => operation.keep_device_uplink,
        UpMessageType::DeviceLocation => operation.keep_device_location,
        UpMessageType::DeviceNotification => {
            operation.keep_device_notification
                && sub_type_allowed(
                    operation.keep_device_notification_sub_types.as_deref(),
                    &message.sub_type,
                )
        }
    };
    keep.then(|| message.clone())
}

/// 通知子类型白名单：未配置放行全部；配置为空列表只放行空子类型。
fn sub_type_allowed(allowed: Option<&[String]>, sub_type: &str) -> bool {
    match allowed {
        None => true,
        Some([]) => sub_type.is_empty(),
        Some(list) => !sub_type.is_empty() && list.iter().any(|item| item == sub_type),
    }
}

/// 只保留列出的点位；点位集合缺省时原样返回。
pub fn filter_points(message: &UpMessage, operation: &FilterPoints) -> UpMessage {
    let mut next = message.clone();
    if let Some(points) = &message.points {
        let kept: Points = points
            .iter()
            .filter(|(name, _)| operation.points.iter().any(|keep| keep == *name))
            .map(|(name, point)| (name.clone(), point.clone()))
            .collect();
        next.points = Some(kept);
    }
    next
}
